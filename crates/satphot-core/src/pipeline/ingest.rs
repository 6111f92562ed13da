use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::error::StoreError;
use crate::io::{decode, Dialect, PhotometryFile};
use crate::lightcurve::{PeriodOutcome, Satellite, SatelliteHeader, SatelliteId};
use crate::period::estimate_period;
use crate::store::{CatalogStore, StoreResult};

use super::types::{
    BatchReport, FileReport, IngestFailure, IngestOutcome, NoOpReporter, PipelineStage,
    ProgressReporter,
};

/// Ingest one upload.
///
/// Parse problems become [`IngestOutcome::Failed`]; only store failures are
/// returned as errors. Bands already stored for the same satellite and start
/// time are skipped. Every new light curve gets a period estimate, and the
/// store is committed before returning.
///
/// The satellite is created from the header before the data table is read,
/// so a file with a good header and a bad table can leave a satellite with
/// no light curves; [`remove_empty_satellites`] deletes those.
pub fn ingest<S: CatalogStore + ?Sized>(
    store: &mut S,
    bytes: &[u8],
    filename: &str,
    config: &AnalysisConfig,
) -> StoreResult<IngestOutcome> {
    let text = match decode(bytes) {
        Ok(text) => text,
        Err(e) => return Ok(failed(filename, e.into())),
    };
    let dialect = match Dialect::detect(filename, text) {
        Ok(d) => d,
        Err(e) => return Ok(failed(filename, e.into())),
    };
    let header = match dialect.parse_header(text) {
        Ok(h) => h,
        Err(e) => return Ok(failed(filename, e.into())),
    };

    let satellite = ensure_satellite(store, &header.satellite)?;

    let table = match dialect.parse_table(text, header) {
        Ok(t) => t,
        Err(e) => return Ok(failed(filename, e.into())),
    };

    let mut records_created = Vec::new();
    let mut skipped_bands = Vec::new();
    for draft in table.into_drafts(config.ingest.rollover_tolerance_hours) {
        if store
            .find_light_curve(satellite.id, draft.start_time, &draft.band)
            .is_some()
        {
            debug!(file = filename, band = %draft.band, "Light curve already stored, skipping");
            skipped_bands.push(draft.band);
            continue;
        }
        let band = draft.band.clone();
        let samples = draft.samples.len();
        let id = match store.insert_light_curve(satellite.id, draft) {
            Ok(id) => id,
            Err(StoreError::DuplicateLightCurve { .. }) => {
                skipped_bands.push(band);
                continue;
            }
            Err(e) => return Err(e),
        };

        let lc = store.light_curve(id)?;
        let estimate = estimate_period(&lc, &config.lomb_scargle);
        store.record_period(id, PeriodOutcome::Estimated(estimate))?;
        info!(
            norad = satellite.norad,
            band = %band,
            samples,
            period = %estimate,
            "Light curve ingested"
        );
        records_created.push(id);
    }

    store.refresh_updated(satellite.id)?;
    store.commit()?;

    Ok(IngestOutcome::Ingested {
        satellite: satellite.id,
        records_created,
        skipped_bands,
    })
}

/// Read a file from disk and ingest it.
pub fn ingest_path<S: CatalogStore + ?Sized>(
    store: &mut S,
    path: &Path,
    config: &AnalysisConfig,
) -> StoreResult<FileReport> {
    let fallback_name = path.display().to_string();
    let outcome = match PhotometryFile::open(path) {
        Ok(file) => ingest(store, file.bytes(), &file.filename, config)?,
        Err(e) => failed(&fallback_name, IngestFailure::Unreadable(e.to_string())),
    };
    Ok(FileReport {
        filename: fallback_name,
        outcome,
    })
}

/// Ingest several files, then remove satellites left without light curves.
///
/// A bad file never stops the batch; a store failure does, after every
/// earlier file has been committed.
pub fn ingest_files<S, P>(store: &mut S, paths: &[P], config: &AnalysisConfig) -> StoreResult<BatchReport>
where
    S: CatalogStore + ?Sized,
    P: AsRef<Path>,
{
    ingest_files_reported(store, paths, config, &NoOpReporter)
}

pub fn ingest_files_reported<S, P>(
    store: &mut S,
    paths: &[P],
    config: &AnalysisConfig,
    reporter: &dyn ProgressReporter,
) -> StoreResult<BatchReport>
where
    S: CatalogStore + ?Sized,
    P: AsRef<Path>,
{
    let mut report = BatchReport::default();

    reporter.begin_stage(PipelineStage::Ingesting, Some(paths.len()));
    for (i, path) in paths.iter().enumerate() {
        report.files.push(ingest_path(store, path.as_ref(), config)?);
        reporter.advance(i + 1);
    }
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Cleanup, None);
    report.removed_satellites = remove_empty_satellites(store)?;
    reporter.finish_stage();

    info!(
        files = report.files.len(),
        failed = report.failed(),
        created = report.records_created(),
        "Batch ingestion finished"
    );
    Ok(report)
}

/// Delete every satellite that owns no light curves.
pub fn remove_empty_satellites<S: CatalogStore + ?Sized>(store: &mut S) -> StoreResult<Vec<Satellite>> {
    let empty: Vec<SatelliteId> = store
        .satellites()
        .into_iter()
        .filter(|s| store.light_curves_of(s.id).is_empty())
        .map(|s| s.id)
        .collect();
    if empty.is_empty() {
        return Ok(Vec::new());
    }

    let mut removed = Vec::with_capacity(empty.len());
    for id in empty {
        let satellite = store.delete_satellite(id)?;
        info!(norad = satellite.norad, "Removed satellite without light curves");
        removed.push(satellite);
    }
    store.commit()?;
    Ok(removed)
}

/// Existing satellite with this NORAD number, or a new one.
fn ensure_satellite<S: CatalogStore + ?Sized>(
    store: &mut S,
    header: &SatelliteHeader,
) -> StoreResult<Satellite> {
    if let Some(existing) = store.find_satellite_by_norad(header.norad) {
        return Ok(existing);
    }
    match store.insert_satellite(header) {
        Ok(id) => {
            info!(norad = header.norad, name = %header.name, "New satellite");
            store.satellite(id)
        }
        Err(StoreError::DuplicateSatellite(norad)) => store
            .find_satellite_by_norad(norad)
            .ok_or(StoreError::DuplicateSatellite(norad)),
        Err(e) => Err(e),
    }
}

fn failed(filename: &str, failure: IngestFailure) -> IngestOutcome {
    warn!(file = filename, error = %failure, "Skipping file");
    IngestOutcome::Failed(failure)
}
