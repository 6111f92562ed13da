use serde::{Deserialize, Serialize};

use crate::consts::{
    FALSE_ALARM_PROBABILITY, FAP_NYQUIST_FACTOR, FINE_SAMPLING_THRESHOLD_SECS,
    HIGH_FREQUENCY_CEILING_HZ, MIN_PERIOD_SAMPLES, PDM_BAND_FACTOR, PDM_BINS,
    PDM_FREQUENCY_STEP_HZ, ROLLOVER_TOLERANCE_HOURS, SAMPLES_PER_PEAK, SEED_RELATIVE_BOUND,
};

/// Tunables for ingestion and period analysis, loadable from TOML.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub lomb_scargle: LombScargleConfig,
    #[serde(default)]
    pub pdm: PdmConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Rows this many hours before the first row are moved to the next day.
    pub rollover_tolerance_hours: f64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            rollover_tolerance_hours: ROLLOVER_TOLERANCE_HOURS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LombScargleConfig {
    /// Curves with fewer samples are reported as insufficient data.
    pub min_samples: usize,
    /// Frequency grid points per expected peak width.
    pub samples_per_peak: usize,
    /// Significance a peak must reach (default 0.01%).
    pub false_alarm_probability: f64,
    /// Upper frequency bound (Hz) for finely sampled curves.
    pub high_frequency_ceiling_hz: f64,
    /// Sample intervals below this (seconds) use the ceiling above.
    pub fine_sampling_threshold_secs: f64,
    /// Nyquist factor of the range the false-alarm level accounts for.
    pub fap_nyquist_factor: f64,
    /// Relative half-width of the band searched around a period hint.
    pub seed_relative_bound: f64,
}

impl Default for LombScargleConfig {
    fn default() -> Self {
        Self {
            min_samples: MIN_PERIOD_SAMPLES,
            samples_per_peak: SAMPLES_PER_PEAK,
            false_alarm_probability: FALSE_ALARM_PROBABILITY,
            high_frequency_ceiling_hz: HIGH_FREQUENCY_CEILING_HZ,
            fine_sampling_threshold_secs: FINE_SAMPLING_THRESHOLD_SECS,
            fap_nyquist_factor: FAP_NYQUIST_FACTOR,
            seed_relative_bound: SEED_RELATIVE_BOUND,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdmConfig {
    /// Search [1 / (factor * P), factor / P] around the candidate period.
    pub band_factor: f64,
    /// Frequency step of the trial grid (Hz).
    pub frequency_step_hz: f64,
    /// Number of phase bins.
    pub bins: usize,
}

impl Default for PdmConfig {
    fn default() -> Self {
        Self {
            band_factor: PDM_BAND_FACTOR,
            frequency_step_hz: PDM_FREQUENCY_STEP_HZ,
            bins: PDM_BINS,
        }
    }
}
