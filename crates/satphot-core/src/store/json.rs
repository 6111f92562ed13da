use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use tracing::debug;

use crate::error::StoreError;

use crate::lightcurve::{
    LightCurve, LightCurveDraft, LightCurveId, PeriodOutcome, Satellite, SatelliteHeader,
    SatelliteId,
};

use super::{CatalogStore, MemoryStore, StoreResult};

/// Catalog kept in memory and written to one JSON file on commit.
///
/// An exclusive lock on `<catalog>.lock` is held while the store is open,
/// so a second handle on the same catalog fails with [`StoreError::Locked`]
/// instead of overwriting the first one's commits.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    inner: MemoryStore,
    _lock: File,
}

impl JsonStore {
    /// Lock and load the catalog at `path`; a missing file is an empty catalog.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let lock = acquire_lock(&sibling(&path, ".lock"), &path)?;
        let inner = if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            let mut inner: MemoryStore = serde_json::from_reader(reader)?;
            inner.reindex();
            debug!(
                path = %path.display(),
                satellites = inner.satellite_count(),
                light_curves = inner.light_curve_count(),
                "Catalog loaded"
            );
            inner
        } else {
            MemoryStore::new()
        };
        Ok(Self {
            path,
            inner,
            _lock: lock,
        })
    }
}

/// `catalog.json` -> `catalog.json<suffix>` in the same directory.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

fn acquire_lock(lock_path: &Path, catalog: &Path) -> StoreResult<File> {
    let file = fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)?;
    match file.try_lock_exclusive() {
        Ok(()) => Ok(file),
        Err(e) if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() => {
            Err(StoreError::Locked(catalog.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

impl CatalogStore for JsonStore {
    fn find_satellite_by_norad(&self, norad: u32) -> Option<Satellite> {
        self.inner.find_satellite_by_norad(norad)
    }

    fn insert_satellite(&mut self, header: &SatelliteHeader) -> StoreResult<SatelliteId> {
        self.inner.insert_satellite(header)
    }

    fn satellite(&self, id: SatelliteId) -> StoreResult<Satellite> {
        self.inner.satellite(id)
    }

    fn satellites(&self) -> Vec<Satellite> {
        self.inner.satellites()
    }

    fn set_satellite_updated(
        &mut self,
        id: SatelliteId,
        updated: Option<DateTime<Utc>>,
    ) -> StoreResult<()> {
        self.inner.set_satellite_updated(id, updated)
    }

    fn delete_satellite(&mut self, id: SatelliteId) -> StoreResult<Satellite> {
        self.inner.delete_satellite(id)
    }

    fn find_light_curve(
        &self,
        satellite: SatelliteId,
        start: DateTime<Utc>,
        band: &str,
    ) -> Option<LightCurveId> {
        self.inner.find_light_curve(satellite, start, band)
    }

    fn insert_light_curve(
        &mut self,
        satellite: SatelliteId,
        draft: LightCurveDraft,
    ) -> StoreResult<LightCurveId> {
        self.inner.insert_light_curve(satellite, draft)
    }

    fn light_curve(&self, id: LightCurveId) -> StoreResult<LightCurve> {
        self.inner.light_curve(id)
    }

    fn light_curve_ids(&self) -> Vec<LightCurveId> {
        self.inner.light_curve_ids()
    }

    fn light_curves_of(&self, satellite: SatelliteId) -> Vec<LightCurveId> {
        self.inner.light_curves_of(satellite)
    }

    fn record_period(&mut self, id: LightCurveId, outcome: PeriodOutcome) -> StoreResult<()> {
        self.inner.record_period(id, outcome)
    }

    /// Write to a sibling temp file, then rename over the catalog.
    fn commit(&mut self) -> StoreResult<()> {
        let tmp = sibling(&self.path, ".tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer(&mut writer, &self.inner)?;
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn latest_start(&self, satellite: SatelliteId) -> StoreResult<Option<DateTime<Utc>>> {
        self.inner.latest_start(satellite)
    }
}
