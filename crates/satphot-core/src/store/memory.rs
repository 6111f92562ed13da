use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::lightcurve::{
    LightCurve, LightCurveDraft, LightCurveId, PeriodOutcome, Satellite, SatelliteHeader,
    SatelliteId,
};

use super::{CatalogStore, StoreResult};

type CurveKey = (SatelliteId, DateTime<Utc>, String);

/// In-memory catalog. Ids are assigned from 1 and never reused.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    next_satellite_id: SatelliteId,
    next_light_curve_id: LightCurveId,
    satellites: BTreeMap<SatelliteId, Satellite>,
    light_curves: BTreeMap<LightCurveId, LightCurve>,
    #[serde(skip)]
    by_norad: HashMap<u32, SatelliteId>,
    #[serde(skip)]
    by_key: HashMap<CurveKey, LightCurveId>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the lookup indexes, e.g. after deserializing.
    pub(crate) fn reindex(&mut self) {
        self.by_norad = self
            .satellites
            .values()
            .map(|s| (s.norad, s.id))
            .collect();
        self.by_key = self
            .light_curves
            .values()
            .map(|lc| ((lc.satellite_id, lc.start_time, lc.band.clone()), lc.id))
            .collect();
        let max_sat = self.satellites.keys().next_back().copied().unwrap_or(0);
        let max_lc = self.light_curves.keys().next_back().copied().unwrap_or(0);
        self.next_satellite_id = self.next_satellite_id.max(max_sat);
        self.next_light_curve_id = self.next_light_curve_id.max(max_lc);
    }

    pub fn satellite_count(&self) -> usize {
        self.satellites.len()
    }

    pub fn light_curve_count(&self) -> usize {
        self.light_curves.len()
    }

    fn light_curve_mut(&mut self, id: LightCurveId) -> StoreResult<&mut LightCurve> {
        self.light_curves
            .get_mut(&id)
            .ok_or(StoreError::LightCurveNotFound(id))
    }
}

impl CatalogStore for MemoryStore {
    fn find_satellite_by_norad(&self, norad: u32) -> Option<Satellite> {
        let id = self.by_norad.get(&norad)?;
        self.satellites.get(id).cloned()
    }

    fn insert_satellite(&mut self, header: &SatelliteHeader) -> StoreResult<SatelliteId> {
        if self.by_norad.contains_key(&header.norad) {
            return Err(StoreError::DuplicateSatellite(header.norad));
        }
        self.next_satellite_id += 1;
        let id = self.next_satellite_id;
        self.satellites.insert(
            id,
            Satellite {
                id,
                norad: header.norad,
                cospar: header.cospar.clone(),
                name: header.name.clone(),
                updated: None,
            },
        );
        self.by_norad.insert(header.norad, id);
        Ok(id)
    }

    fn satellite(&self, id: SatelliteId) -> StoreResult<Satellite> {
        self.satellites
            .get(&id)
            .cloned()
            .ok_or(StoreError::SatelliteNotFound(id))
    }

    fn satellites(&self) -> Vec<Satellite> {
        self.satellites.values().cloned().collect()
    }

    fn set_satellite_updated(
        &mut self,
        id: SatelliteId,
        updated: Option<DateTime<Utc>>,
    ) -> StoreResult<()> {
        let satellite = self
            .satellites
            .get_mut(&id)
            .ok_or(StoreError::SatelliteNotFound(id))?;
        satellite.updated = updated;
        Ok(())
    }

    fn delete_satellite(&mut self, id: SatelliteId) -> StoreResult<Satellite> {
        let satellite = self
            .satellites
            .remove(&id)
            .ok_or(StoreError::SatelliteNotFound(id))?;
        self.by_norad.remove(&satellite.norad);
        self.light_curves.retain(|_, lc| lc.satellite_id != id);
        self.by_key.retain(|(sat, _, _), _| *sat != id);
        Ok(satellite)
    }

    fn find_light_curve(
        &self,
        satellite: SatelliteId,
        start: DateTime<Utc>,
        band: &str,
    ) -> Option<LightCurveId> {
        self.by_key
            .get(&(satellite, start, band.to_string()))
            .copied()
    }

    fn insert_light_curve(
        &mut self,
        satellite: SatelliteId,
        draft: LightCurveDraft,
    ) -> StoreResult<LightCurveId> {
        if !self.satellites.contains_key(&satellite) {
            return Err(StoreError::SatelliteNotFound(satellite));
        }
        let key = (satellite, draft.start_time, draft.band.clone());
        if self.by_key.contains_key(&key) {
            return Err(StoreError::DuplicateLightCurve {
                satellite,
                start: draft.start_time.to_rfc3339(),
                band: draft.band,
            });
        }
        self.next_light_curve_id += 1;
        let id = self.next_light_curve_id;
        self.light_curves
            .insert(id, LightCurve::from_draft(id, satellite, draft));
        self.by_key.insert(key, id);
        Ok(id)
    }

    fn light_curve(&self, id: LightCurveId) -> StoreResult<LightCurve> {
        self.light_curves
            .get(&id)
            .cloned()
            .ok_or(StoreError::LightCurveNotFound(id))
    }

    fn light_curve_ids(&self) -> Vec<LightCurveId> {
        self.light_curves.keys().copied().collect()
    }

    fn light_curves_of(&self, satellite: SatelliteId) -> Vec<LightCurveId> {
        self.light_curves
            .values()
            .filter(|lc| lc.satellite_id == satellite)
            .map(|lc| lc.id)
            .collect()
    }

    fn record_period(&mut self, id: LightCurveId, outcome: PeriodOutcome) -> StoreResult<()> {
        self.light_curve_mut(id)?.record_outcome(outcome);
        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        Ok(())
    }

    fn latest_start(&self, satellite: SatelliteId) -> StoreResult<Option<DateTime<Utc>>> {
        Ok(self
            .light_curves
            .values()
            .filter(|lc| lc.satellite_id == satellite)
            .map(|lc| lc.start_time)
            .max())
    }
}
