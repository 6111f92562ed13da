mod common;

use satphot_core::config::{LombScargleConfig, PdmConfig};
use satphot_core::error::SatphotError;
use satphot_core::period::pdm::dispersion;
use satphot_core::period::{
    estimate_period, estimate_period_seeded, periodogram, refine_period, PeriodEstimate,
    UndeterminedReason,
};

use common::*;

fn noisy_sinusoid(n: usize, dt: f64, period: f64) -> Vec<f64> {
    sinusoid(n, dt, period, 0.5)
        .into_iter()
        .zip(gaussian_noise(n, 0.02, 7))
        .map(|(s, noise)| s + noise - 12.0)
        .collect()
}

// ---------------------------------------------------------------------------
// Lomb-Scargle estimate
// ---------------------------------------------------------------------------

#[test]
fn test_sinusoid_period_within_one_percent() {
    let lc = light_curve(1.0, noisy_sinusoid(600, 1.0, 37.0), None);
    let estimate = estimate_period(&lc, &LombScargleConfig::default());
    let PeriodEstimate::Periodic(p) = estimate else {
        panic!("expected a period, got {estimate:?}");
    };
    assert!((p - 37.0).abs() / 37.0 < 0.01, "period {p}");
}

#[test]
fn test_fine_sampling_with_errors_finds_period() {
    let n = 2000;
    let errors = vec![0.02; n];
    let lc = light_curve(0.1, noisy_sinusoid(n, 0.1, 6.5), Some(errors));
    let p = estimate_period(&lc, &LombScargleConfig::default())
        .period_secs()
        .unwrap();
    assert!((p - 6.5).abs() / 6.5 < 0.01, "period {p}");
}

#[test]
fn test_gaussian_noise_is_aperiodic() {
    let lc = light_curve(1.0, gaussian_noise(600, 0.1, 42), None);
    assert_eq!(
        estimate_period(&lc, &LombScargleConfig::default()),
        PeriodEstimate::Aperiodic
    );
}

#[test]
fn test_fifty_samples_are_insufficient() {
    let lc = light_curve(1.0, sinusoid(50, 1.0, 10.0, 0.5), None);
    assert_eq!(
        estimate_period(&lc, &LombScargleConfig::default()),
        PeriodEstimate::Undetermined(UndeterminedReason::InsufficientData { samples: 50 })
    );
}

#[test]
fn test_zero_time_span_is_undetermined() {
    let lc = light_curve(0.0, sinusoid(200, 1.0, 10.0, 0.5), None);
    assert_eq!(
        estimate_period(&lc, &LombScargleConfig::default()),
        PeriodEstimate::Undetermined(UndeterminedReason::DegenerateTimeAxis)
    );
}

#[test]
fn test_constant_magnitude_is_undetermined() {
    let lc = light_curve(1.0, vec![11.0; 300], None);
    assert_eq!(
        estimate_period(&lc, &LombScargleConfig::default()),
        PeriodEstimate::Undetermined(UndeterminedReason::ConstantSignal)
    );
}

#[test]
fn test_nan_magnitude_is_undetermined() {
    let mut mags = sinusoid(300, 1.0, 20.0, 0.5);
    mags[10] = f64::NAN;
    let lc = light_curve(1.0, mags, None);
    assert_eq!(
        estimate_period(&lc, &LombScargleConfig::default()),
        PeriodEstimate::Undetermined(UndeterminedReason::NumericalFailure)
    );
}

#[test]
fn test_min_samples_is_configurable() {
    let config = LombScargleConfig {
        min_samples: 40,
        ..LombScargleConfig::default()
    };
    let lc = light_curve(1.0, sinusoid(50, 1.0, 10.0, 0.5), None);
    assert!(!matches!(
        estimate_period(&lc, &config),
        PeriodEstimate::Undetermined(UndeterminedReason::InsufficientData { .. })
    ));
}

#[test]
fn test_seeded_search_stays_near_hint() {
    let lc = light_curve(1.0, noisy_sinusoid(600, 1.0, 37.0), None);
    let config = LombScargleConfig::default();
    let p = estimate_period_seeded(&lc, 35.0, &config)
        .unwrap()
        .period_secs()
        .unwrap();
    assert!((p - 37.0).abs() / 37.0 < 0.01, "period {p}");

    let far = estimate_period_seeded(&lc, 100.0, &config).unwrap();
    assert!(far.period_secs().map_or(true, |p| p > 79.0));
}

#[test]
fn test_seeded_search_rejects_bad_hint() {
    let lc = light_curve(1.0, sinusoid(200, 1.0, 10.0, 0.5), None);
    let err = estimate_period_seeded(&lc, -3.0, &LombScargleConfig::default()).unwrap_err();
    assert!(matches!(err, SatphotError::InvalidPeriod(_)));
}

#[test]
fn test_periodogram_exposes_level_and_axes() {
    let lc = light_curve(1.0, noisy_sinusoid(600, 1.0, 37.0), None);
    let pg = periodogram(&lc, &LombScargleConfig::default()).unwrap();
    assert_eq!(pg.frequency.len(), pg.power.len());
    assert!(pg.false_alarm_level > 0.0 && pg.false_alarm_level < 1.0);
    assert!(pg.power.iter().all(|p| (0.0..=1.0 + 1e-9).contains(p)));
    let periods = pg.periods();
    assert!((periods[0] - 1.0 / pg.frequency[0]).abs() < 1e-9);
    assert!(pg.best_period().is_periodic());
}

// ---------------------------------------------------------------------------
// PDM refinement
// ---------------------------------------------------------------------------

#[test]
fn test_pdm_recovers_fundamental_from_harmonic() {
    let dt = 0.5;
    let mags: Vec<f64> = (0..800)
        .map(|i| {
            let t = i as f64 * dt;
            12.0 + 0.3 * (std::f64::consts::TAU * t / 20.0).cos()
                + 0.3 * (std::f64::consts::TAU * t / 40.0 + 0.5).cos()
        })
        .collect();
    let lc = light_curve(dt, mags, None);

    let refined = refine_period(&lc, 20.0, &PdmConfig::default()).unwrap();
    let p = refined.refined.unwrap();
    assert!((p - 40.0).abs() / 40.0 < 0.01, "refined {p}");
    assert_eq!(refined.candidate, 20.0);
    assert_eq!(refined.primary.period, 20.0);

    let plot = refined.refined_plot.unwrap();
    assert_eq!(plot.phase.len(), 800);
    assert_eq!(plot.epoch, lc.samples.timestamps[0]);
    assert_eq!(plot.phase[0], 0.0);
    assert!(plot.phase.iter().all(|ph| (0.0..1.0).contains(ph)));
}

#[test]
fn test_pdm_rejects_non_positive_candidate() {
    let lc = light_curve(1.0, sinusoid(200, 1.0, 10.0, 0.5), None);
    for bad in [0.0, -5.0, f64::NAN] {
        let err = refine_period(&lc, bad, &PdmConfig::default()).unwrap_err();
        assert!(matches!(err, SatphotError::InvalidPeriod(_)));
    }
}

#[test]
fn test_pdm_on_constant_curve_has_no_refinement() {
    let lc = light_curve(1.0, vec![10.0; 200], None);
    let refined = refine_period(&lc, 30.0, &PdmConfig::default()).unwrap();
    assert!(refined.refined.is_none());
    assert!(refined.refined_plot.is_none());
    assert_eq!(refined.primary.phase.len(), 200);
}

#[test]
fn test_dispersion_needs_bins_and_positive_frequency() {
    let t: Vec<f64> = (0..40).map(|i| i as f64).collect();
    let y: Vec<f64> = t.iter().map(|ti| (ti / 5.0).sin()).collect();
    assert!(dispersion(&t, &y, 0.1, 0).is_none());
    assert!(dispersion(&t, &y, 0.0, 10).is_none());
    assert!(dispersion(&t, &y, 0.1, 10).is_some());
}
