mod common;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use satphot_core::config::AnalysisConfig;
use satphot_core::lightcurve::PeriodOutcome;
use satphot_core::period::PeriodEstimate;
use satphot_core::pipeline::{
    ingest, run_backfill, set_manual_period, BackfillOutcome, PipelineStage, ProgressReporter,
};
use satphot_core::store::{CatalogStore, MemoryStore};

use common::*;

/// Store with one periodic curve and one two-band pass too short to analyse.
fn populated_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    let config = AnalysisConfig::default();

    let n = 600;
    let periodic = single_band_text(
        44713,
        1.0,
        &row_times(62_381.0, 1.0, n),
        &sinusoid(n, 1.0, 37.0, 0.5),
        false,
        None,
    );
    ingest(&mut store, periodic.as_bytes(), "a.phV", &config).unwrap();

    let short = two_band_text(51511, 0.5, &row_times(3_600.0, 0.5, 20), &[(11.0, 10.5); 20]);
    ingest(&mut store, short.as_bytes(), "b.phc", &config).unwrap();
    store
}

#[derive(Default)]
struct CountingReporter {
    stages: Mutex<Vec<(PipelineStage, Option<usize>)>>,
    advanced: AtomicUsize,
}

impl ProgressReporter for CountingReporter {
    fn begin_stage(&self, stage: PipelineStage, total: Option<usize>) {
        self.stages.lock().unwrap().push((stage, total));
    }

    fn advance(&self, _items_done: usize) {
        self.advanced.fetch_add(1, Ordering::Relaxed);
    }
}

#[test]
fn test_backfill_yields_one_outcome_per_curve() {
    let mut store = populated_store();
    let config = AnalysisConfig::default();

    let records: Vec<_> = run_backfill(&mut store, &config.lomb_scargle).collect();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.outcome.is_ok()));
    let periodic = records
        .iter()
        .filter(|r| {
            matches!(
                r.outcome,
                Ok(BackfillOutcome::Estimated(PeriodEstimate::Periodic(_)))
            )
        })
        .count();
    assert_eq!(periodic, 1);
}

#[test]
fn test_backfill_is_idempotent() {
    let mut store = populated_store();
    let config = AnalysisConfig::default();

    run_backfill(&mut store, &config.lomb_scargle).run().unwrap();
    let before: Vec<_> = store
        .light_curve_ids()
        .into_iter()
        .map(|id| store.light_curve(id).unwrap())
        .collect();
    let summary = run_backfill(&mut store, &config.lomb_scargle).run().unwrap();
    let after: Vec<_> = store
        .light_curve_ids()
        .into_iter()
        .map(|id| store.light_curve(id).unwrap())
        .collect();

    assert_eq!(before, after);
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.periodic, 1);
    assert!(summary.failures.is_empty());
    assert_eq!(summary.satellites_refreshed, 2);
}

#[test]
fn test_backfill_restores_satellite_update_times() {
    let mut store = populated_store();
    let config = AnalysisConfig::default();
    for sat in store.satellites() {
        store.set_satellite_updated(sat.id, None).unwrap();
    }

    run_backfill(&mut store, &config.lomb_scargle).run().unwrap();

    for sat in store.satellites() {
        assert_eq!(sat.updated, store.latest_start(sat.id).unwrap());
        assert!(sat.updated.is_some());
    }
}

#[test]
fn test_backfill_cancelled_before_start_processes_nothing() {
    let mut store = populated_store();
    let config = AnalysisConfig::default();
    let cancel = Arc::new(AtomicBool::new(true));

    let summary = run_backfill(&mut store, &config.lomb_scargle)
        .cancel_on(cancel)
        .run()
        .unwrap();
    assert!(summary.cancelled);
    assert_eq!(summary.processed, 0);
}

#[test]
fn test_backfill_stops_between_curves() {
    let mut store = populated_store();
    let config = AnalysisConfig::default();
    let cancel = Arc::new(AtomicBool::new(false));

    let mut backfill = run_backfill(&mut store, &config.lomb_scargle).cancel_on(cancel.clone());
    assert_eq!(backfill.total(), 3);
    assert!(backfill.next().is_some());
    cancel.store(true, Ordering::Relaxed);
    assert!(backfill.next().is_none());
    assert!(backfill.was_cancelled());
    assert!(backfill.next().is_none());
}

#[test]
fn test_backfill_keeps_manual_periods() {
    let mut store = populated_store();
    let config = AnalysisConfig::default();
    let id = store.light_curve_ids()[0];
    set_manual_period(&mut store, id, 74.0).unwrap();

    let records: Vec<_> = run_backfill(&mut store, &config.lomb_scargle).collect();
    let kept = records.iter().find(|r| r.light_curve == id).unwrap();
    assert_eq!(kept.outcome, Ok(BackfillOutcome::KeptManual(74.0)));

    let lc = store.light_curve(id).unwrap();
    assert_eq!(lc.period_outcome, Some(PeriodOutcome::Manual(74.0)));
    assert_eq!(lc.estimated_period, Some(74.0));

    let summary = run_backfill(&mut store, &config.lomb_scargle).run().unwrap();
    assert_eq!(summary.kept_manual, 1);
    assert_eq!(summary.periodic, 0);
}

#[test]
fn test_backfill_reports_progress() {
    let mut store = populated_store();
    let config = AnalysisConfig::default();
    let reporter = CountingReporter::default();

    run_backfill(&mut store, &config.lomb_scargle)
        .run_reported(&reporter)
        .unwrap();
    assert_eq!(
        *reporter.stages.lock().unwrap(),
        vec![
            (PipelineStage::Backfill, Some(3)),
            (PipelineStage::RefreshingSatellites, Some(2)),
        ]
    );
    // Three curves, then two satellites.
    assert_eq!(reporter.advanced.load(Ordering::Relaxed), 5);
}

#[test]
fn test_manual_period_must_be_positive() {
    let mut store = populated_store();
    let id = store.light_curve_ids()[0];
    assert!(set_manual_period(&mut store, id, 0.0).is_err());
    assert!(set_manual_period(&mut store, id, f64::NAN).is_err());
}
