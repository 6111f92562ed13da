//! Phase dispersion minimization (Stellingwerf 1978) around a candidate period.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::config::PdmConfig;
use crate::consts::{EPSILON, PARALLEL_GRID_THRESHOLD};
use crate::error::{Result, SatphotError};
use crate::lightcurve::LightCurve;
use crate::phase::fold;

/// A light curve folded at one period, epoch at its first sample.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PhasePlot {
    /// Seconds.
    pub period: f64,
    pub epoch: DateTime<Utc>,
    pub phase: Vec<f64>,
    pub magnitude: Vec<f64>,
    pub magnitude_error: Option<Vec<f64>>,
}

impl PhasePlot {
    pub fn new(lc: &LightCurve, period: f64) -> Result<Self> {
        if !(period.is_finite() && period > 0.0) {
            return Err(SatphotError::InvalidPeriod(period));
        }
        let epoch = *lc
            .samples
            .timestamps
            .first()
            .ok_or(SatphotError::EmptyLightCurve(lc.id))?;
        let phase = lc
            .samples
            .seconds_since_start()
            .into_iter()
            .map(|t| fold(t, period, 0.0))
            .collect();
        Ok(Self {
            period,
            epoch,
            phase,
            magnitude: lc.samples.magnitude.clone(),
            magnitude_error: lc.samples.magnitude_error.clone(),
        })
    }
}

/// Candidate and refined periods with both folded views.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RefinedPeriod {
    /// Seconds.
    pub candidate: f64,
    /// Seconds; `None` when every trial dispersion was undefined.
    pub refined: Option<f64>,
    /// Dispersion statistic at the refined period.
    pub theta: Option<f64>,
    pub primary: PhasePlot,
    pub refined_plot: Option<PhasePlot>,
}

/// Search `[1 / (k * P), k / P]` for the frequency of least phase dispersion.
pub fn refine_period(lc: &LightCurve, candidate: f64, config: &PdmConfig) -> Result<RefinedPeriod> {
    if !(candidate.is_finite() && candidate > 0.0) {
        return Err(SatphotError::InvalidPeriod(candidate));
    }
    if config.band_factor <= 1.0 || config.frequency_step_hz <= 0.0 || config.bins < 2 {
        return Err(SatphotError::InvalidArgument(format!(
            "PDM needs band_factor > 1, a positive step and at least 2 bins, got {config:?}"
        )));
    }
    let primary = PhasePlot::new(lc, candidate)?;

    let t = lc.samples.seconds_since_start();
    let best = normalized_magnitude(&lc.samples.magnitude).and_then(|m| {
        search(
            &t,
            &m,
            1.0 / (config.band_factor * candidate),
            config.band_factor / candidate,
            config.frequency_step_hz,
            config.bins,
        )
    });

    let (refined, theta, refined_plot) = match best {
        Some((frequency, theta)) => {
            let period = 1.0 / frequency;
            debug!(candidate, refined = period, theta, "PDM refinement");
            (Some(period), Some(theta), Some(PhasePlot::new(lc, period)?))
        }
        None => {
            debug!(candidate, "PDM dispersion undefined at every trial");
            (None, None, None)
        }
    };

    Ok(RefinedPeriod {
        candidate,
        refined,
        theta,
        primary,
        refined_plot,
    })
}

/// Magnitudes mapped to `[0, 1]` with the brightest sample at 1.
///
/// `None` when the values are constant or not finite.
pub fn normalized_magnitude(magnitude: &[f64]) -> Option<Vec<f64>> {
    let (min, max) = magnitude
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &m| {
            (lo.min(m), hi.max(m))
        });
    let range = max - min;
    if !range.is_finite() || range <= EPSILON {
        return None;
    }
    Some(magnitude.iter().map(|m| (max - m) / range).collect())
}

/// Lowest-dispersion frequency over an evenly stepped grid, with its theta.
pub fn search(
    t: &[f64],
    y: &[f64],
    min_frequency: f64,
    max_frequency: f64,
    step: f64,
    bins: usize,
) -> Option<(f64, f64)> {
    if !(min_frequency > 0.0 && max_frequency > min_frequency) {
        return None;
    }
    let count = ((max_frequency - min_frequency) / step).floor() as usize + 1;
    let trial = |k: usize| {
        let f = min_frequency + step * k as f64;
        dispersion(t, y, f, bins).map(|theta| (f, theta))
    };
    let pick = |a: (f64, f64), b: (f64, f64)| if b.1 < a.1 { b } else { a };

    if count >= PARALLEL_GRID_THRESHOLD {
        (0..count)
            .into_par_iter()
            .filter_map(trial)
            .reduce_with(pick)
    } else {
        (0..count).filter_map(trial).reduce(pick)
    }
}

/// Stellingwerf theta: pooled within-bin variance over total variance, for
/// data folded at `frequency`. Bins with fewer than two points are ignored.
pub fn dispersion(t: &[f64], y: &[f64], frequency: f64, bins: usize) -> Option<f64> {
    let n = t.len().min(y.len());
    if n < 2 || bins == 0 || !(frequency.is_finite() && frequency > 0.0) {
        return None;
    }

    let mut count = vec![0usize; bins];
    let mut sum = vec![0.0; bins];
    let mut sum_sq = vec![0.0; bins];
    let period = 1.0 / frequency;
    for (&ti, &yi) in t.iter().zip(y) {
        let bin = ((fold(ti, period, 0.0) * bins as f64) as usize).min(bins - 1);
        count[bin] += 1;
        sum[bin] += yi;
        sum_sq[bin] += yi * yi;
    }

    let (mut within, mut dof) = (0.0, 0usize);
    for j in 0..bins {
        if count[j] < 2 {
            continue;
        }
        let c = count[j] as f64;
        within += sum_sq[j] - sum[j] * sum[j] / c;
        dof += count[j] - 1;
    }
    if dof == 0 {
        return None;
    }

    let total: f64 = y[..n].iter().sum();
    let total_sq: f64 = y[..n].iter().map(|v| v * v).sum();
    let variance = (total_sq - total * total / n as f64) / (n - 1) as f64;
    if variance <= EPSILON {
        return None;
    }
    let theta = (within / dof as f64) / variance;
    theta.is_finite().then_some(theta)
}
