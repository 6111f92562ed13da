use approx::assert_abs_diff_eq;
use chrono::{TimeZone, Utc};

use satphot_core::error::SatphotError;
use satphot_core::phase::{coverage_bar, julian_date, phase, phases, ObservationSpan};

// ---------------------------------------------------------------------------
// Folding
// ---------------------------------------------------------------------------

#[test]
fn test_phase_in_unit_interval_and_periodic() {
    let periods = [0.37, 1.0, 2.5, 13.75];
    let epochs = [2_459_000.123, 2_460_500.5];
    let times = [2_460_000.0, 2_460_001.7, 2_458_999.9, 2_460_123.456];
    for &p in &periods {
        for &e in &epochs {
            for &t in &times {
                let ph = phase(t, p, e).unwrap();
                assert!((0.0..1.0).contains(&ph), "phase {ph}");
                for k in [-3, 1, 7] {
                    let shifted = phase(t + k as f64 * p, p, e).unwrap();
                    let diff = (shifted - ph).abs();
                    assert!(diff < 1e-6 || (1.0 - diff) < 1e-6, "k={k} {ph} vs {shifted}");
                }
            }
        }
    }
}

#[test]
fn test_reduced_epoch_is_normalized() {
    let t = 2_460_342.8125;
    let p = 0.8431;
    let reduced = phase(t, p, 60_100.25).unwrap();
    let full = phase(t, p, 2_460_100.25).unwrap();
    assert_abs_diff_eq!(reduced, full, epsilon = 1e-12);
}

#[test]
fn test_non_positive_period_is_an_error() {
    for p in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            phase(2_460_000.0, p, 2_459_000.0),
            Err(SatphotError::InvalidPeriod(_))
        ));
    }
}

#[test]
fn test_sequence_keeps_order_and_length() {
    let t = vec![2_460_000.0, 2_460_000.5, 2_460_001.25];
    let ph = phases(t.as_slice(), 1.0, 2_460_000.0).unwrap();
    assert_eq!(ph.len(), 3);
    assert_abs_diff_eq!(ph[0], 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(ph[1], 0.5, epsilon = 1e-9);
    assert_abs_diff_eq!(ph[2], 0.25, epsilon = 1e-9);

    let scalar = phases(&2_460_000.5, 1.0, 2_460_000.0).unwrap();
    assert_abs_diff_eq!(scalar, 0.5, epsilon = 1e-9);
}

#[test]
fn test_julian_date_of_j2000() {
    let t = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
    assert_abs_diff_eq!(julian_date(t), 2_451_545.0, epsilon = 1e-9);
}

// ---------------------------------------------------------------------------
// Coverage bar
// ---------------------------------------------------------------------------

fn cells(bar: &str) -> Vec<char> {
    assert!(bar.starts_with('[') && bar.ends_with(']'));
    bar[1..bar.len() - 1].chars().collect()
}

#[test]
fn test_bar_covers_plain_interval() {
    let c = cells(&coverage_bar(0.2, 0.4));
    assert_eq!(c.len(), 50);
    assert!(c[..10].iter().all(|&x| x == '-'));
    assert!(c[10..=20].iter().all(|&x| x == '*'));
    assert!(c[21..].iter().all(|&x| x == '-'));
}

#[test]
fn test_bar_wrapped_interval_marks_both_ends() {
    let c = cells(&coverage_bar(0.8, 0.2));
    assert_eq!(c.len(), 50);
    assert!(c[..10].iter().all(|&x| x == '*'));
    assert!(c[10..=40].iter().all(|&x| x == '-'));
    assert!(c[41..].iter().all(|&x| x == '*'));
}

#[test]
fn test_span_longer_than_period_is_fully_covered() {
    let span = ObservationSpan::new(2_460_000.0, 2_460_000.3);
    let bar = span.coverage_bar(0.25, 2_459_999.9).unwrap();
    assert_eq!(bar, format!("[{}]", "*".repeat(50)));
}

#[test]
fn test_span_phases_follow_ephemeris() {
    let span = ObservationSpan::new(2_460_000.1, 2_460_000.3);
    assert_abs_diff_eq!(span.phase_start(1.0, 60_000.0).unwrap(), 0.1, epsilon = 1e-6);
    assert_abs_diff_eq!(span.phase_end(1.0, 60_000.0).unwrap(), 0.3, epsilon = 1e-6);
    let c = cells(&span.coverage_bar(1.0, 60_000.0).unwrap());
    assert_eq!(c.iter().filter(|&&x| x == '*').count(), 11);
}
