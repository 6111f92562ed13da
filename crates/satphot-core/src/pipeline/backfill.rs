use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::LombScargleConfig;
use crate::error::StoreError;
use crate::lightcurve::{LightCurveId, PeriodOutcome};
use crate::period::estimate_period;
use crate::store::{CatalogStore, StoreResult};

use super::types::{
    BackfillOutcome, BackfillRecord, BackfillSummary, NoOpReporter, PipelineStage,
    ProgressReporter,
};

/// Re-estimates the period of every stored light curve, one at a time.
///
/// Each item is the outcome for one curve, already committed. Once the
/// curves are exhausted (or the run is cancelled) every satellite's
/// last-update time is re-derived. Manually set periods are left alone.
pub struct Backfill<'a, S: CatalogStore + ?Sized> {
    store: &'a mut S,
    config: &'a LombScargleConfig,
    pending: std::vec::IntoIter<LightCurveId>,
    total: usize,
    cancel: Option<Arc<AtomicBool>>,
    cancelled: bool,
    refreshed: Option<StoreResult<usize>>,
}

/// Start a backfill over the whole store.
pub fn run_backfill<'a, S: CatalogStore + ?Sized>(
    store: &'a mut S,
    config: &'a LombScargleConfig,
) -> Backfill<'a, S> {
    let ids = store.light_curve_ids();
    Backfill {
        total: ids.len(),
        pending: ids.into_iter(),
        store,
        config,
        cancel: None,
        cancelled: false,
        refreshed: None,
    }
}

impl<'a, S: CatalogStore + ?Sized> Backfill<'a, S> {
    /// Stop before the next curve once `flag` is set.
    pub fn cancel_on(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Drive the backfill to the end, reporting progress per curve and
    /// then per refreshed satellite.
    pub fn run_reported(mut self, reporter: &dyn ProgressReporter) -> StoreResult<BackfillSummary> {
        let mut summary = BackfillSummary::default();
        reporter.begin_stage(PipelineStage::Backfill, Some(self.total));
        while let Some(record) = self.next_curve() {
            summary.record(record);
            reporter.advance(summary.processed);
        }
        reporter.finish_stage();
        self.finish(reporter);

        summary.cancelled = self.cancelled;
        summary.satellites_refreshed = self.refreshed.take().unwrap_or(Ok(0))?;
        info!(
            processed = summary.processed,
            periodic = summary.periodic,
            kept_manual = summary.kept_manual,
            failed = summary.failures.len(),
            cancelled = summary.cancelled,
            "Backfill finished"
        );
        Ok(summary)
    }

    pub fn run(self) -> StoreResult<BackfillSummary> {
        self.run_reported(&NoOpReporter)
    }

    /// Next curve's record; `None` once the curves run out or a cancel
    /// was requested.
    fn next_curve(&mut self) -> Option<BackfillRecord> {
        if self.is_cancel_requested() {
            if !self.cancelled {
                self.cancelled = true;
                info!("Backfill cancelled");
            }
            return None;
        }
        let id = self.pending.next()?;
        let outcome = self.process(id).map_err(|e| {
            warn!(light_curve = id, error = %e, "Backfill skipped light curve");
            e.to_string()
        });
        Some(BackfillRecord {
            light_curve: id,
            outcome,
        })
    }

    fn process(&mut self, id: LightCurveId) -> Result<BackfillOutcome, StoreError> {
        let lc = self.store.light_curve(id)?;
        if let Some(PeriodOutcome::Manual(period)) = lc.period_outcome {
            return Ok(BackfillOutcome::KeptManual(period));
        }
        let estimate = estimate_period(&lc, self.config);
        self.store
            .record_period(id, PeriodOutcome::Estimated(estimate))?;
        self.store.commit()?;
        Ok(BackfillOutcome::Estimated(estimate))
    }

    /// Re-derive every satellite's last-update time, once.
    fn finish(&mut self, reporter: &dyn ProgressReporter) {
        if self.refreshed.is_some() {
            return;
        }
        let refreshed = self.refresh_satellites(reporter);
        if let Err(e) = &refreshed {
            warn!(error = %e, "Failed to refresh satellite update times");
        }
        self.refreshed = Some(refreshed);
    }

    fn refresh_satellites(&mut self, reporter: &dyn ProgressReporter) -> StoreResult<usize> {
        let satellites = self.store.satellites();
        reporter.begin_stage(PipelineStage::RefreshingSatellites, Some(satellites.len()));
        for (i, satellite) in satellites.iter().enumerate() {
            self.store.refresh_updated(satellite.id)?;
            reporter.advance(i + 1);
        }
        reporter.finish_stage();
        self.store.commit()?;
        Ok(satellites.len())
    }

    fn is_cancel_requested(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

impl<S: CatalogStore + ?Sized> Iterator for Backfill<'_, S> {
    type Item = BackfillRecord;

    fn next(&mut self) -> Option<BackfillRecord> {
        if self.refreshed.is_some() {
            return None;
        }
        if let Some(record) = self.next_curve() {
            return Some(record);
        }
        self.finish(&NoOpReporter);
        None
    }
}
