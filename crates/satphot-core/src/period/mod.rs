//! Period search: Lomb-Scargle estimate, then phase-dispersion refinement.

pub mod fap;
pub mod lomb_scargle;
pub mod pdm;
pub mod peaks;

use std::fmt;

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LombScargleConfig;
use crate::error::{Result, SatphotError};
use crate::lightcurve::{LightCurve, Samples};

use fap::BaluevBound;
use lomb_scargle::{weighted_time_variance, FrequencyGrid, LombScargle};

pub use pdm::{refine_period, PhasePlot, RefinedPeriod};

/// Why no period could be searched for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UndeterminedReason {
    /// Fewer samples than the configured minimum.
    InsufficientData { samples: usize },
    /// Zero or non-finite time span, or an empty search band.
    DegenerateTimeAxis,
    /// Magnitudes do not vary.
    ConstantSignal,
    /// Non-finite input or intermediate value.
    NumericalFailure,
}

impl fmt::Display for UndeterminedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientData { samples } => write!(f, "insufficient data ({samples} samples)"),
            Self::DegenerateTimeAxis => write!(f, "degenerate time axis"),
            Self::ConstantSignal => write!(f, "constant signal"),
            Self::NumericalFailure => write!(f, "numerical failure"),
        }
    }
}

/// Outcome of a period search.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PeriodEstimate {
    /// Significant period, in seconds.
    Periodic(f64),
    /// Searched, but no peak beat the false-alarm level.
    Aperiodic,
    /// Not searched.
    Undetermined(UndeterminedReason),
}

impl PeriodEstimate {
    pub fn period_secs(&self) -> Option<f64> {
        match self {
            Self::Periodic(p) => Some(*p),
            _ => None,
        }
    }

    pub fn is_periodic(&self) -> bool {
        matches!(self, Self::Periodic(_))
    }
}

impl fmt::Display for PeriodEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Periodic(p) => write!(f, "{p:.3} s"),
            Self::Aperiodic => write!(f, "aperiodic"),
            Self::Undetermined(reason) => write!(f, "undetermined: {reason}"),
        }
    }
}

/// Frequency band searched by the estimator, in Hz.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchBand {
    pub min_frequency: f64,
    pub max_frequency: f64,
}

impl SearchBand {
    /// Wide band: at least two cycles in the span, up to Nyquist (or a fixed
    /// ceiling for sub-second sampling).
    pub fn wide(sample_interval: f64, baseline: f64, config: &LombScargleConfig) -> Self {
        let max_frequency = if sample_interval < config.fine_sampling_threshold_secs {
            config.high_frequency_ceiling_hz
        } else {
            1.0 / (2.0 * sample_interval)
        };
        Self {
            min_frequency: 1.0 / (baseline / 2.0),
            max_frequency,
        }
    }

    /// Narrow band of periods within `hint * (1 +/- bound)`.
    pub fn around(hint: f64, config: &LombScargleConfig) -> Self {
        let bound = config.seed_relative_bound;
        Self {
            min_frequency: 1.0 / (hint * (1.0 + bound)),
            max_frequency: 1.0 / (hint * (1.0 - bound)),
        }
    }
}

/// Power spectrum of a light curve together with its significance level.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Periodogram {
    /// Hz.
    pub frequency: Array1<f64>,
    pub power: Array1<f64>,
    /// Power a peak must reach to be significant.
    pub false_alarm_level: f64,
    pub band: SearchBand,
}

impl Periodogram {
    /// Period axis in seconds, matching `frequency`.
    pub fn periods(&self) -> Array1<f64> {
        self.frequency.mapv(|f| 1.0 / f)
    }

    /// Highest significant peak, as a period estimate.
    pub fn best_period(&self) -> PeriodEstimate {
        if self.power.iter().any(|p| !p.is_finite()) {
            return PeriodEstimate::Undetermined(UndeterminedReason::NumericalFailure);
        }
        let power = self.power.to_vec();
        let significant = peaks::peaks_above(&power, self.false_alarm_level);
        debug!(
            peaks = significant.len(),
            level = self.false_alarm_level,
            "Significant periodogram peaks"
        );
        match peaks::highest(&power, &significant) {
            Some(i) => PeriodEstimate::Periodic(1.0 / self.frequency[i]),
            None => PeriodEstimate::Aperiodic,
        }
    }
}

/// Estimate the period of a light curve over the wide band.
pub fn estimate_period(lc: &LightCurve, config: &LombScargleConfig) -> PeriodEstimate {
    estimate(&lc.samples, lc.sample_interval, None, config)
}

/// Estimate the period within `hint * (1 +/- seed_relative_bound)`.
pub fn estimate_period_seeded(
    lc: &LightCurve,
    hint: f64,
    config: &LombScargleConfig,
) -> Result<PeriodEstimate> {
    if !(hint.is_finite() && hint > 0.0) || config.seed_relative_bound >= 1.0 {
        return Err(SatphotError::InvalidPeriod(hint));
    }
    Ok(estimate(&lc.samples, lc.sample_interval, Some(hint), config))
}

/// Periodogram over the wide band, or why it could not be computed.
pub fn periodogram(
    lc: &LightCurve,
    config: &LombScargleConfig,
) -> std::result::Result<Periodogram, UndeterminedReason> {
    compute_periodogram(&lc.samples, lc.sample_interval, None, config)
}

/// Estimate from raw samples; `hint` selects the narrow band.
pub fn estimate(
    samples: &Samples,
    sample_interval: f64,
    hint: Option<f64>,
    config: &LombScargleConfig,
) -> PeriodEstimate {
    match compute_periodogram(samples, sample_interval, hint, config) {
        Ok(periodogram) => periodogram.best_period(),
        Err(reason) => PeriodEstimate::Undetermined(reason),
    }
}

fn compute_periodogram(
    samples: &Samples,
    sample_interval: f64,
    hint: Option<f64>,
    config: &LombScargleConfig,
) -> std::result::Result<Periodogram, UndeterminedReason> {
    let n = samples.len();
    if n < config.min_samples.max(2) {
        return Err(UndeterminedReason::InsufficientData { samples: n });
    }
    if samples.magnitude.iter().any(|m| !m.is_finite()) {
        return Err(UndeterminedReason::NumericalFailure);
    }

    let t = samples.seconds_since_start();
    let baseline = t[n - 1] - t[0];
    if !(baseline.is_finite() && baseline > 0.0) {
        return Err(UndeterminedReason::DegenerateTimeAxis);
    }

    let band = match hint {
        Some(hint) => SearchBand::around(hint, config),
        None => SearchBand::wide(sample_interval, baseline, config),
    };
    let grid = FrequencyGrid::new(
        band.min_frequency,
        band.max_frequency,
        baseline,
        config.samples_per_peak,
    )
    .ok_or(UndeterminedReason::DegenerateTimeAxis)?;
    debug!(
        min_frequency = band.min_frequency,
        max_frequency = band.max_frequency,
        points = grid.len,
        "Lomb-Scargle search band"
    );

    let errors = usable_errors(samples.magnitude_error.as_deref());
    let model = LombScargle::new(&t, &samples.magnitude, errors)
        .ok_or(UndeterminedReason::ConstantSignal)?;
    let frequency = grid.frequencies();
    let power = model.power(&frequency);

    let bound = BaluevBound {
        n,
        fmax: config.fap_nyquist_factor * 0.5 * n as f64 / baseline,
        time_variance: weighted_time_variance(&t, errors),
    };
    let false_alarm_level = bound
        .level(config.false_alarm_probability)
        .ok_or(UndeterminedReason::NumericalFailure)?;

    Ok(Periodogram {
        frequency,
        power,
        false_alarm_level,
        band,
    })
}

/// Magnitude errors are only used as weights when all are positive and finite.
fn usable_errors(errors: Option<&[f64]>) -> Option<&[f64]> {
    let errors = errors?;
    if errors.iter().all(|e| e.is_finite() && *e > 0.0) {
        Some(errors)
    } else {
        debug!("Magnitude errors unusable as weights, running unweighted");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fine_sampling_uses_ceiling() {
        let config = LombScargleConfig::default();
        let band = SearchBand::wide(0.1, 400.0, &config);
        assert_eq!(band.max_frequency, 0.83);
        assert_eq!(band.min_frequency, 0.005);
        let band = SearchBand::wide(2.0, 400.0, &config);
        assert_eq!(band.max_frequency, 0.25);
    }

    #[test]
    fn seeded_band_brackets_hint() {
        let config = LombScargleConfig::default();
        let band = SearchBand::around(10.0, &config);
        assert!(band.min_frequency < 0.1 && band.max_frequency > 0.1);
        assert!((1.0 / band.max_frequency - 8.0).abs() < 1e-9);
        assert!((1.0 / band.min_frequency - 12.0).abs() < 1e-9);
    }

    #[test]
    fn outcome_text() {
        assert_eq!(PeriodEstimate::Periodic(12.34567).to_string(), "12.346 s");
        assert_eq!(
            PeriodEstimate::Undetermined(UndeterminedReason::InsufficientData { samples: 50 })
                .to_string(),
            "undetermined: insufficient data (50 samples)"
        );
    }
}
