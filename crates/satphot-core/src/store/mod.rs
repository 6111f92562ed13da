//! Catalog persistence.
//!
//! Stores enforce the uniqueness rules themselves: inserting a satellite
//! whose NORAD number exists, or a light curve whose (satellite, start, band)
//! exists, fails instead of creating a duplicate.

mod json;
mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::lightcurve::{
    LightCurve, LightCurveDraft, LightCurveId, PeriodOutcome, Satellite, SatelliteHeader,
    SatelliteId,
};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

pub trait CatalogStore {
    fn find_satellite_by_norad(&self, norad: u32) -> Option<Satellite>;

    /// Insert-or-fail on a duplicate NORAD number.
    fn insert_satellite(&mut self, header: &SatelliteHeader) -> StoreResult<SatelliteId>;

    fn satellite(&self, id: SatelliteId) -> StoreResult<Satellite>;

    /// All satellites, ordered by id.
    fn satellites(&self) -> Vec<Satellite>;

    fn set_satellite_updated(
        &mut self,
        id: SatelliteId,
        updated: Option<DateTime<Utc>>,
    ) -> StoreResult<()>;

    /// Delete a satellite and every light curve it owns.
    fn delete_satellite(&mut self, id: SatelliteId) -> StoreResult<Satellite>;

    fn find_light_curve(
        &self,
        satellite: SatelliteId,
        start: DateTime<Utc>,
        band: &str,
    ) -> Option<LightCurveId>;

    /// Insert-or-fail on a duplicate (satellite, start, band).
    fn insert_light_curve(
        &mut self,
        satellite: SatelliteId,
        draft: LightCurveDraft,
    ) -> StoreResult<LightCurveId>;

    fn light_curve(&self, id: LightCurveId) -> StoreResult<LightCurve>;

    /// Ids of every light curve, ascending.
    fn light_curve_ids(&self) -> Vec<LightCurveId>;

    /// Ids of the light curves of one satellite, ascending.
    fn light_curves_of(&self, satellite: SatelliteId) -> Vec<LightCurveId>;

    fn record_period(&mut self, id: LightCurveId, outcome: PeriodOutcome) -> StoreResult<()>;

    /// Make every change so far durable.
    fn commit(&mut self) -> StoreResult<()>;

    /// Latest light-curve start of a satellite.
    fn latest_start(&self, satellite: SatelliteId) -> StoreResult<Option<DateTime<Utc>>> {
        let mut latest = None;
        for id in self.light_curves_of(satellite) {
            let start = self.light_curve(id)?.start_time;
            latest = latest.max(Some(start));
        }
        Ok(latest)
    }

    /// Re-derive a satellite's last-update time from its light curves.
    fn refresh_updated(&mut self, satellite: SatelliteId) -> StoreResult<Option<DateTime<Utc>>> {
        let latest = self.latest_start(satellite)?;
        self.set_satellite_updated(satellite, latest)?;
        Ok(latest)
    }
}
