//! Store-level operations: ingestion, period computation and backfill.

mod backfill;
mod ingest;
mod types;

pub use backfill::{run_backfill, Backfill};
pub use ingest::{
    ingest, ingest_files, ingest_files_reported, ingest_path, remove_empty_satellites,
};
pub use types::{
    BackfillOutcome, BackfillRecord, BackfillSummary, BatchReport, FileReport, IngestFailure,
    IngestOutcome, PipelineStage, ProgressReporter,
};

use tracing::info;

use crate::config::AnalysisConfig;
use crate::error::{Result, SatphotError};
use crate::lightcurve::{LightCurveId, PeriodOutcome};
use crate::period::{estimate_period, estimate_period_seeded, refine_period, PeriodEstimate, RefinedPeriod};
use crate::store::CatalogStore;

/// Estimate, record and commit the period of one light curve.
///
/// With a `hint` the search is limited to the narrow band around it.
pub fn compute_period<S: CatalogStore + ?Sized>(
    store: &mut S,
    id: LightCurveId,
    hint: Option<f64>,
    config: &AnalysisConfig,
) -> Result<PeriodEstimate> {
    let lc = store.light_curve(id)?;
    let estimate = match hint {
        Some(hint) => estimate_period_seeded(&lc, hint, &config.lomb_scargle)?,
        None => estimate_period(&lc, &config.lomb_scargle),
    };
    store.record_period(id, PeriodOutcome::Estimated(estimate))?;
    store.commit()?;
    info!(light_curve = id, period = %estimate, "Period computed");
    Ok(estimate)
}

/// Operator override of a light curve's period, in seconds.
pub fn set_manual_period<S: CatalogStore + ?Sized>(
    store: &mut S,
    id: LightCurveId,
    seconds: f64,
) -> Result<()> {
    if !(seconds.is_finite() && seconds > 0.0) {
        return Err(SatphotError::InvalidPeriod(seconds));
    }
    store.record_period(id, PeriodOutcome::Manual(seconds))?;
    store.commit()?;
    info!(light_curve = id, period = seconds, "Manual period set");
    Ok(())
}

/// PDM refinement of a stored light curve around `candidate`, or around
/// its stored period when no candidate is given.
pub fn refine<S: CatalogStore + ?Sized>(
    store: &S,
    id: LightCurveId,
    candidate: Option<f64>,
    config: &AnalysisConfig,
) -> Result<RefinedPeriod> {
    let lc = store.light_curve(id)?;
    let candidate = candidate.or(lc.estimated_period).ok_or_else(|| {
        SatphotError::InvalidArgument(format!(
            "light curve {id} has no period ({}); pass one explicitly",
            lc.period_label()
        ))
    })?;
    refine_period(&lc, candidate, &config.pdm)
}
