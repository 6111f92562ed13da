use std::fmt;

use crate::error::ParseError;
use crate::lightcurve::{LightCurveId, Satellite, SatelliteId};
use crate::period::PeriodEstimate;

/// Pipeline stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Ingesting,
    Cleanup,
    Backfill,
    RefreshingSatellites,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ingesting => write!(f, "Ingesting files"),
            Self::Cleanup => write!(f, "Removing empty satellites"),
            Self::Backfill => write!(f, "Estimating periods"),
            Self::RefreshingSatellites => write!(f, "Updating satellites"),
        }
    }
}

/// Thread-safe progress reporting for batch operations.
///
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new stage has started. `total_items` is the number of work items
    /// in it, if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One more work item of the current stage is done.
    fn advance(&self, _items_done: usize) {}

    fn finish_stage(&self) {}
}

pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// Why an upload produced no light curves.
#[derive(Clone, Debug, PartialEq)]
pub enum IngestFailure {
    Parse(ParseError),
    /// The file could not be read at all.
    Unreadable(String),
}

impl fmt::Display for IngestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{e}"),
            Self::Unreadable(e) => write!(f, "unreadable: {e}"),
        }
    }
}

impl From<ParseError> for IngestFailure {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

/// Result of ingesting one upload.
#[derive(Clone, Debug, PartialEq)]
pub enum IngestOutcome {
    Ingested {
        satellite: SatelliteId,
        records_created: Vec<LightCurveId>,
        /// Bands already present for this satellite and start time.
        skipped_bands: Vec<String>,
    },
    Failed(IngestFailure),
}

impl IngestOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ingested { .. })
    }

    pub fn records_created(&self) -> &[LightCurveId] {
        match self {
            Self::Ingested {
                records_created, ..
            } => records_created,
            Self::Failed(_) => &[],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FileReport {
    pub filename: String,
    pub outcome: IngestOutcome,
}

/// Per-file outcomes of a batch upload plus the cleanup that followed it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    /// Satellites deleted because they ended up without light curves.
    pub removed_satellites: Vec<Satellite>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.files.len() - self.succeeded()
    }

    pub fn records_created(&self) -> usize {
        self.files
            .iter()
            .map(|f| f.outcome.records_created().len())
            .sum()
    }
}

/// Result of backfilling one light curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BackfillOutcome {
    /// Freshly estimated and recorded.
    Estimated(PeriodEstimate),
    /// Operator-set period (seconds), left as is without re-estimating.
    KeptManual(f64),
}

/// What happened to one light curve during a backfill.
#[derive(Clone, Debug, PartialEq)]
pub struct BackfillRecord {
    pub light_curve: LightCurveId,
    /// What was stored, or why the curve was skipped.
    pub outcome: Result<BackfillOutcome, String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BackfillSummary {
    pub processed: usize,
    pub periodic: usize,
    pub kept_manual: usize,
    pub failures: Vec<BackfillRecord>,
    pub cancelled: bool,
    pub satellites_refreshed: usize,
}

impl BackfillSummary {
    pub fn record(&mut self, record: BackfillRecord) {
        self.processed += 1;
        match &record.outcome {
            Ok(BackfillOutcome::Estimated(estimate)) if estimate.is_periodic() => {
                self.periodic += 1
            }
            Ok(BackfillOutcome::Estimated(_)) => {}
            Ok(BackfillOutcome::KeptManual(_)) => self.kept_manual += 1,
            Err(_) => self.failures.push(record),
        }
    }
}
