//! Phase folding and observation coverage.

use chrono::{DateTime, Utc};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::consts::{COVERAGE_BAR_WIDTH, REDUCED_JD_OFFSET, SECONDS_PER_DAY, UNIX_EPOCH_JD};
use crate::error::{Result, SatphotError};

/// Full Julian date of an instant.
pub fn julian_date(t: DateTime<Utc>) -> f64 {
    let secs = t.timestamp() as f64 + f64::from(t.timestamp_subsec_micros()) / 1e6;
    UNIX_EPOCH_JD + secs / SECONDS_PER_DAY
}

/// Offset a reduced Julian date (below 2 400 000) to a full one.
pub fn normalize_epoch(epoch: f64) -> f64 {
    if epoch < REDUCED_JD_OFFSET {
        epoch + REDUCED_JD_OFFSET
    } else {
        epoch
    }
}

fn check_period(period: f64) -> Result<()> {
    if period.is_finite() && period > 0.0 {
        Ok(())
    } else {
        Err(SatphotError::InvalidPeriod(period))
    }
}

/// `((t - epoch) mod period) / period`, in `[0, 1)`, with no epoch
/// normalization. The caller guarantees `period > 0`.
pub fn fold(t: f64, period: f64, epoch: f64) -> f64 {
    let phase = (t - epoch).rem_euclid(period) / period;
    // rem_euclid can round up to exactly `period` for tiny negative offsets.
    if phase >= 1.0 {
        0.0
    } else {
        phase
    }
}

/// Phase of Julian date `t` against a catalog ephemeris.
///
/// `epoch` may be a reduced Julian date. Fails on a non-positive or
/// non-finite period.
pub fn phase(t: f64, period: f64, epoch: f64) -> Result<f64> {
    check_period(period)?;
    if !epoch.is_finite() {
        return Err(SatphotError::InvalidArgument(format!(
            "epoch must be finite, got {epoch}"
        )));
    }
    Ok(fold(t, period, normalize_epoch(epoch)))
}

/// Anything that can be folded, keeping its shape.
pub trait Phased {
    type Output;

    fn phased(&self, period: f64, epoch: f64) -> Result<Self::Output>;
}

impl Phased for f64 {
    type Output = f64;

    fn phased(&self, period: f64, epoch: f64) -> Result<f64> {
        phase(*self, period, epoch)
    }
}

impl Phased for [f64] {
    type Output = Vec<f64>;

    fn phased(&self, period: f64, epoch: f64) -> Result<Vec<f64>> {
        self.iter().map(|&t| phase(t, period, epoch)).collect()
    }
}

impl Phased for Array1<f64> {
    type Output = Array1<f64>;

    fn phased(&self, period: f64, epoch: f64) -> Result<Array1<f64>> {
        phase(0.0, period, epoch)?;
        let epoch = normalize_epoch(epoch);
        Ok(self.mapv(|t| fold(t, period, epoch)))
    }
}

/// Phases of many Julian dates.
pub fn phases<T: Phased + ?Sized>(times: &T, period: f64, epoch: f64) -> Result<T::Output> {
    times.phased(period, epoch)
}

/// One observation, as a Julian date interval.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObservationSpan {
    pub start_jd: f64,
    pub end_jd: f64,
}

impl ObservationSpan {
    pub fn new(start_jd: f64, end_jd: f64) -> Self {
        Self { start_jd, end_jd }
    }

    pub fn from_times(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::new(julian_date(start), julian_date(end))
    }

    pub fn phase_start(&self, period: f64, epoch: f64) -> Result<f64> {
        phase(self.start_jd, period, epoch)
    }

    pub fn phase_end(&self, period: f64, epoch: f64) -> Result<f64> {
        phase(self.end_jd, period, epoch)
    }

    /// Bar of the phases this span covers; see [`coverage_bar`].
    ///
    /// A span lasting at least one period covers every phase.
    pub fn coverage_bar(&self, period: f64, epoch: f64) -> Result<String> {
        let start = self.phase_start(period, epoch)?;
        let end = self.phase_end(period, epoch)?;
        if self.end_jd - self.start_jd >= period {
            return Ok(full_bar());
        }
        Ok(coverage_bar(start, end))
    }
}

const BAR_STEPS: f64 = 10.0;

fn full_bar() -> String {
    format!("[{}]", "*".repeat(COVERAGE_BAR_WIDTH))
}

/// Render `[phase_start, phase_end]` as `[` + 50 cells + `]`, `*` where the
/// interval covers and `-` elsewhere. Phases snap to tenths.
///
/// A wrapped interval (`phase_start > phase_end`) covers the cells outside
/// `[phase_end, phase_start]`.
pub fn coverage_bar(phase_start: f64, phase_end: f64) -> String {
    let cells_per_step = COVERAGE_BAR_WIDTH as f64 / BAR_STEPS;
    let from = (phase_start * BAR_STEPS).round_ties_even() * cells_per_step;
    let to = (phase_end * BAR_STEPS).round_ties_even() * cells_per_step;

    let (lo, hi, invert) = if from <= to {
        (from, to, false)
    } else {
        (to, from, true)
    };
    let cells: String = (0..COVERAGE_BAR_WIDTH)
        .map(|i| {
            let inside = (lo..=hi).contains(&(i as f64));
            if inside != invert {
                '*'
            } else {
                '-'
            }
        })
        .collect();
    format!("[{cells}]")
}
