use thiserror::Error;

/// Why a photometry file could not be turned into light curves.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unknown file dialect for extension {0:?}")]
    UnknownDialect(String),

    #[error("File is not valid UTF-8")]
    NotUtf8,

    #[error("Header truncated: expected at least {expected} lines, got {found}")]
    TruncatedHeader { expected: usize, found: usize },

    #[error("Missing header field: {0}")]
    MissingField(&'static str),

    #[error("Invalid header field {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("Invalid timestamp {0:?}")]
    InvalidTimestamp(String),

    #[error("Row {row}: expected at least {expected} columns, found {found}")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row}, column {column}: invalid number {value:?}")]
    InvalidNumber {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("Data table is empty")]
    EmptyTable,
}

/// Failures raised by a catalog store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Satellite with NORAD {0} already exists")]
    DuplicateSatellite(u32),

    #[error("Light curve already exists for satellite {satellite}, start {start}, band {band}")]
    DuplicateLightCurve {
        satellite: u64,
        start: String,
        band: String,
    },

    #[error("Satellite {0} not found")]
    SatelliteNotFound(u64),

    #[error("Light curve {0} not found")]
    LightCurveNotFound(u64),

    #[error("Catalog {} is open elsewhere", .0.display())]
    Locked(std::path::PathBuf),

    #[error("Catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SatphotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Period must be positive and finite, got {0}")]
    InvalidPeriod(f64),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Light curve {0} has no samples")]
    EmptyLightCurve(u64),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SatphotError>;
