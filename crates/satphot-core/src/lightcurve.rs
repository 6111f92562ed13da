use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::period::PeriodEstimate;

pub type SatelliteId = u64;
pub type LightCurveId = u64;

/// A tracked satellite, identified by its NORAD catalog number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Satellite {
    pub id: SatelliteId,
    pub norad: u32,
    /// International (COSPAR) designator.
    pub cospar: String,
    pub name: String,
    /// Start time of the most recent light curve.
    pub updated: Option<DateTime<Utc>>,
}

/// Satellite identity as read from a file header, before it has a store id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SatelliteHeader {
    pub norad: u32,
    pub cospar: String,
    pub name: String,
}

/// Parallel per-sample series of one light curve.
///
/// Every optional series, when present, has the same length as `timestamps`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Samples {
    pub timestamps: Vec<DateTime<Utc>>,
    /// Magnitudes (larger is fainter).
    pub magnitude: Vec<f64>,
    pub magnitude_error: Option<Vec<f64>>,
    pub flux: Option<Vec<f64>>,
    pub flux_error: Option<Vec<f64>>,
    /// Degrees.
    pub azimuth: Option<Vec<f64>>,
    /// Degrees.
    pub elevation: Option<Vec<f64>>,
    /// Kilometres.
    pub range: Option<Vec<f64>>,
}

impl Samples {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// True when every present series matches the timestamp count.
    pub fn is_consistent(&self) -> bool {
        let n = self.timestamps.len();
        let optional = [
            &self.magnitude_error,
            &self.flux,
            &self.flux_error,
            &self.azimuth,
            &self.elevation,
            &self.range,
        ];
        self.magnitude.len() == n
            && optional
                .iter()
                .all(|series| series.as_ref().map_or(true, |s| s.len() == n))
    }

    /// Seconds elapsed since the first sample.
    pub fn seconds_since_start(&self) -> Vec<f64> {
        let Some(&t0) = self.timestamps.first() else {
            return Vec::new();
        };
        self.timestamps
            .iter()
            .map(|&t| seconds_between(t0, t))
            .collect()
    }
}

/// Signed seconds from `from` to `to` with microsecond resolution.
pub fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let delta = to - from;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1e6,
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}

/// A parsed light curve that has not been attached to a satellite yet.
#[derive(Clone, Debug, PartialEq)]
pub struct LightCurveDraft {
    pub band: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Nominal seconds between samples.
    pub sample_interval: f64,
    pub site: Option<String>,
    pub tle_snapshot: Option<String>,
    pub samples: Samples,
}

/// How the stored period of a light curve was obtained.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PeriodOutcome {
    Estimated(PeriodEstimate),
    /// Set by an operator, in seconds.
    Manual(f64),
}

impl PeriodOutcome {
    pub fn period_secs(&self) -> Option<f64> {
        match self {
            Self::Estimated(estimate) => estimate.period_secs(),
            Self::Manual(p) => Some(*p),
        }
    }
}

impl fmt::Display for PeriodOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Estimated(estimate) => write!(f, "{estimate}"),
            Self::Manual(p) => write!(f, "{p:.3} s (manual)"),
        }
    }
}

/// Canonical stored light curve: one object, one band, one pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightCurve {
    pub id: LightCurveId,
    pub satellite_id: SatelliteId,
    pub band: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub sample_interval: f64,
    pub site: Option<String>,
    pub tle_snapshot: Option<String>,
    pub samples: Samples,
    /// Best current period in seconds. `None` until computed, or when aperiodic.
    pub estimated_period: Option<f64>,
    /// `None` until period estimation has run.
    pub period_outcome: Option<PeriodOutcome>,
}

impl LightCurve {
    pub fn from_draft(id: LightCurveId, satellite_id: SatelliteId, draft: LightCurveDraft) -> Self {
        Self {
            id,
            satellite_id,
            band: draft.band,
            start_time: draft.start_time,
            end_time: draft.end_time,
            sample_interval: draft.sample_interval,
            site: draft.site,
            tle_snapshot: draft.tle_snapshot,
            samples: draft.samples,
            estimated_period: None,
            period_outcome: None,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Store a period outcome, keeping `estimated_period` in sync with it.
    pub fn record_outcome(&mut self, outcome: PeriodOutcome) {
        self.estimated_period = outcome.period_secs();
        self.period_outcome = Some(outcome);
    }

    /// Text shown in listings: the period, or why there is none.
    pub fn period_label(&self) -> String {
        match &self.period_outcome {
            None => "not computed".to_string(),
            Some(PeriodOutcome::Estimated(PeriodEstimate::Aperiodic)) => "Aperiodic".to_string(),
            Some(outcome) => outcome.to_string(),
        }
    }
}
