#![allow(dead_code)]

use std::f64::consts::TAU;
use std::io::Write;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tempfile::NamedTempFile;

use satphot_core::lightcurve::{LightCurve, LightCurveDraft, Samples};

pub const DATE: &str = "2025-01-30";

/// `HH:MM:SS.fff` for a number of seconds after midnight, wrapping at 24 h.
pub fn time_of_day(seconds: f64) -> String {
    let ms = (seconds * 1000.0).round() as i64;
    let ms = ms.rem_euclid(86_400_000);
    let t = NaiveTime::from_num_seconds_from_midnight_opt(
        (ms / 1000) as u32,
        ((ms % 1000) * 1_000_000) as u32,
    )
    .unwrap();
    t.format("%H:%M:%S%.3f").to_string()
}

/// Row times starting at `start` seconds after midnight, `dt` apart.
pub fn row_times(start: f64, dt: f64, n: usize) -> Vec<String> {
    (0..n).map(|i| time_of_day(start + i as f64 * dt)).collect()
}

/// Legacy two-band (`.phc`) file text.
pub fn two_band_text(norad: u32, dt: f64, times: &[String], mags: &[(f64, f64)]) -> String {
    let mut s = String::new();
    s += &format!("{DATE} {}000\n", times[0]);
    s += &format!("{DATE} {}000\n", times[times.len() - 1]);
    s += "COSPAR ID = 2022-002A\n";
    s += &format!("NORAD ID = {norad}\n");
    s += "NAME = STARLINK-3259\n";
    s += &format!("dt = {dt}\n");
    s += "Time  impB  impV  fonB  fonV  mB  mV  Az  El  Rg\n";
    for (t, (b, v)) in times.iter().zip(mags) {
        s += &format!("{t} 1200 1500 30 40 {b:.4} {v:.4} 182.5 45.1 1050.2\n");
    }
    s
}

/// Single-band (`.ph<label>`) file text; `with_error` adds the magnitude
/// error column.
pub fn single_band_text(
    norad: u32,
    dt: f64,
    times: &[String],
    mags: &[f64],
    with_error: bool,
    filter: Option<&str>,
) -> String {
    let mut s = String::new();
    s += "# Satellite photometry\n";
    s += "# STARLINK-1007\n";
    s += "# 1 44713U 19074A   25030.50000000  .00001234  00000-0  12345-3 0  9991\n";
    s += "# 2 44713  53.0540 123.4567 0001234  89.1234 270.9876 15.06390000 12345\n";
    s += &format!("# {DATE} {}000;\n", times[0]);
    s += &format!("# {DATE} {}000;\n", times[times.len() - 1]);
    s += "# COSPAR = 2019-074A\n";
    s += &format!("# NORAD  = {norad}\n");
    s += "# NAME  = STARLINK-1007\n";
    s += &format!("# dt = {dt}\n");
    s += "# SITE_NAME   = Derenivka\n";
    if let Some(f) = filter {
        s += &format!("# Filter = {f}\n");
    }
    for (t, m) in times.iter().zip(mags) {
        if with_error {
            s += &format!("{DATE} {t} 512.1 498.7 3.2 1.1 15000.0 120.0 {m:.4} 0.0150 182.5 45.1 1050.2\n");
        } else {
            s += &format!("{DATE} {t} 512.1 498.7 3.2 15000.0 120.0 {m:.4} 182.5 45.1 1050.2\n");
        }
    }
    s
}

/// Write `contents` to a temp file with the given extension.
pub fn write_temp(contents: &str, extension: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(&format!(".{extension}"))
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Magnitudes `base + amplitude * sin(2 pi t / period)` at `t = i * dt`.
pub fn sinusoid(n: usize, dt: f64, period: f64, amplitude: f64) -> Vec<f64> {
    (0..n)
        .map(|i| 12.0 + amplitude * (TAU * i as f64 * dt / period).sin())
        .collect()
}

/// Seeded Gaussian noise around magnitude 12.
pub fn gaussian_noise(n: usize, sigma: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, sigma).unwrap();
    (0..n).map(|_| 12.0 + normal.sample(&mut rng)).collect()
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 30, 17, 19, 41).unwrap()
}

/// In-memory light curve with evenly spaced samples.
pub fn light_curve(dt: f64, magnitude: Vec<f64>, magnitude_error: Option<Vec<f64>>) -> LightCurve {
    let start = start_time();
    let timestamps: Vec<DateTime<Utc>> = (0..magnitude.len())
        .map(|i| start + Duration::microseconds((i as f64 * dt * 1e6).round() as i64))
        .collect();
    let end = timestamps.last().copied().unwrap_or(start);
    LightCurve::from_draft(
        1,
        1,
        LightCurveDraft {
            band: "V".into(),
            start_time: start,
            end_time: end,
            sample_interval: dt,
            site: None,
            tle_snapshot: None,
            samples: Samples {
                timestamps,
                magnitude,
                magnitude_error,
                ..Samples::default()
            },
        },
    )
}
