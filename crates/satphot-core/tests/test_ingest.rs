mod common;

use chrono::NaiveDate;

use satphot_core::config::AnalysisConfig;
use satphot_core::error::ParseError;
use satphot_core::lightcurve::PeriodOutcome;
use satphot_core::period::{PeriodEstimate, UndeterminedReason};
use satphot_core::pipeline::{
    ingest, ingest_files, remove_empty_satellites, IngestFailure, IngestOutcome,
};
use satphot_core::store::{CatalogStore, MemoryStore};

use common::*;

fn periodic_single_band(norad: u32) -> String {
    let n = 600;
    let times = row_times(62_381.0, 1.0, n);
    let mags = sinusoid(n, 1.0, 37.0, 0.5);
    single_band_text(norad, 1.0, &times, &mags, true, None)
}

// ---------------------------------------------------------------------------
// Single upload
// ---------------------------------------------------------------------------

#[test]
fn test_ingest_creates_satellite_and_estimates_period() {
    let mut store = MemoryStore::new();
    let config = AnalysisConfig::default();
    let text = periodic_single_band(44713);

    let outcome = ingest(&mut store, text.as_bytes(), "44713.phV", &config).unwrap();
    assert!(outcome.is_ok());
    assert_eq!(outcome.records_created().len(), 1);

    let sat = store.find_satellite_by_norad(44713).unwrap();
    assert_eq!(sat.name, "STARLINK-1007");
    assert_eq!(sat.cospar, "2019-074A");

    let lc = store.light_curve(outcome.records_created()[0]).unwrap();
    assert_eq!(lc.band, "V");
    assert_eq!(lc.len(), 600);
    assert_eq!(sat.updated, Some(lc.start_time));
    let p = lc.estimated_period.unwrap();
    assert!((p - 37.0).abs() / 37.0 < 0.01);
}

#[test]
fn test_ingesting_twice_is_a_no_op() {
    let mut store = MemoryStore::new();
    let config = AnalysisConfig::default();
    let times = row_times(62_381.0, 0.5, 20);
    let text = two_band_text(51511, 0.5, &times, &vec![(11.0, 10.5); 20]);

    let first = ingest(&mut store, text.as_bytes(), "a.phc", &config).unwrap();
    assert_eq!(first.records_created().len(), 2);

    let second = ingest(&mut store, text.as_bytes(), "a.phc", &config).unwrap();
    match second {
        IngestOutcome::Ingested {
            records_created,
            skipped_bands,
            ..
        } => {
            assert!(records_created.is_empty());
            assert_eq!(skipped_bands, vec!["B".to_string(), "V".to_string()]);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(store.light_curve_ids().len(), 2);
    assert_eq!(store.satellites().len(), 1);
}

#[test]
fn test_short_curve_is_stored_as_insufficient_data() {
    let mut store = MemoryStore::new();
    let times = row_times(62_381.0, 0.5, 20);
    let text = two_band_text(51511, 0.5, &times, &vec![(11.0, 10.5); 20]);
    let outcome = ingest(&mut store, text.as_bytes(), "a.phc", &AnalysisConfig::default()).unwrap();

    for id in outcome.records_created() {
        let lc = store.light_curve(*id).unwrap();
        assert_eq!(
            lc.period_outcome,
            Some(PeriodOutcome::Estimated(PeriodEstimate::Undetermined(
                UndeterminedReason::InsufficientData { samples: 20 }
            )))
        );
        assert_eq!(lc.estimated_period, None);
    }
}

#[test]
fn test_rollover_file_spans_two_days() {
    let mut store = MemoryStore::new();
    let times: Vec<String> = ["23:58:00.000", "23:59:30.000", "00:01:15.000", "00:03:00.000"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let text = two_band_text(51511, 0.5, &times, &[(11.0, 10.5); 4]);
    let outcome = ingest(&mut store, text.as_bytes(), "late.phc", &AnalysisConfig::default()).unwrap();
    let lc = store.light_curve(outcome.records_created()[0]).unwrap();
    assert_eq!(
        lc.samples.timestamps[3].date_naive(),
        NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
    );
}

#[test]
fn test_bad_header_creates_nothing() {
    let mut store = MemoryStore::new();
    let times = row_times(62_381.0, 0.5, 5);
    let text = two_band_text(51511, 0.5, &times, &[(11.0, 10.5); 5]).replace("dt = 0.5", "dt = fast");
    let outcome = ingest(&mut store, text.as_bytes(), "a.phc", &AnalysisConfig::default()).unwrap();
    assert!(matches!(
        outcome,
        IngestOutcome::Failed(IngestFailure::Parse(ParseError::InvalidField { field: "dt", .. }))
    ));
    assert!(store.satellites().is_empty());
}

#[test]
fn test_unknown_extension_fails_cleanly() {
    let mut store = MemoryStore::new();
    let outcome = ingest(&mut store, b"hello\nworld\n", "notes.txt", &AnalysisConfig::default()).unwrap();
    assert!(!outcome.is_ok());
    assert!(outcome.records_created().is_empty());
}

// ---------------------------------------------------------------------------
// Batches and cleanup
// ---------------------------------------------------------------------------

#[test]
fn test_bad_table_leaves_satellite_until_cleanup() {
    let mut store = MemoryStore::new();
    let times = row_times(62_381.0, 0.1, 5);
    let text = single_band_text(40000, 0.1, &times, &[9.0; 5], true, None).replace("182.5", "abc");

    let outcome = ingest(&mut store, text.as_bytes(), "bad.phV", &AnalysisConfig::default()).unwrap();
    assert!(!outcome.is_ok());
    let orphan = store.find_satellite_by_norad(40000).unwrap();
    assert!(store.light_curves_of(orphan.id).is_empty());

    let removed = remove_empty_satellites(&mut store).unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].norad, 40000);
    assert!(store.find_satellite_by_norad(40000).is_none());
}

#[test]
fn test_batch_reports_each_file_and_cleans_up() {
    let good = write_temp(&periodic_single_band(44713), "phV");
    let times = row_times(62_381.0, 0.1, 5);
    let bad = write_temp(
        &single_band_text(40000, 0.1, &times, &[9.0; 5], true, None).replace("182.5", "abc"),
        "phR",
    );
    let missing = std::path::PathBuf::from("/nonexistent/upload.phV");
    let paths = vec![
        good.path().to_path_buf(),
        bad.path().to_path_buf(),
        missing,
    ];

    let mut store = MemoryStore::new();
    let report = ingest_files(&mut store, &paths, &AnalysisConfig::default()).unwrap();

    assert_eq!(report.files.len(), 3);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 2);
    assert_eq!(report.records_created(), 1);
    assert!(matches!(
        report.files[2].outcome,
        IngestOutcome::Failed(IngestFailure::Unreadable(_))
    ));
    assert_eq!(report.removed_satellites.len(), 1);
    assert_eq!(report.removed_satellites[0].norad, 40000);

    let sats = store.satellites();
    assert_eq!(sats.len(), 1);
    assert_eq!(sats[0].norad, 44713);
}

#[test]
fn test_new_pass_of_known_satellite_moves_updated_forward() {
    let mut store = MemoryStore::new();
    let config = AnalysisConfig::default();
    let early = two_band_text(51511, 0.5, &row_times(3_600.0, 0.5, 10), &[(11.0, 10.5); 10]);
    let late = two_band_text(51511, 0.5, &row_times(7_200.0, 0.5, 10), &[(11.0, 10.5); 10]);

    ingest(&mut store, late.as_bytes(), "late.phc", &config).unwrap();
    ingest(&mut store, early.as_bytes(), "early.phc", &config).unwrap();

    let sat = store.find_satellite_by_norad(51511).unwrap();
    assert_eq!(store.light_curves_of(sat.id).len(), 4);
    let latest = store.latest_start(sat.id).unwrap().unwrap();
    assert_eq!(sat.updated, Some(latest));
    assert_eq!(latest.format("%H:%M:%S").to_string(), "02:00:00");
}
