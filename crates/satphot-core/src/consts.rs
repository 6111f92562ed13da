/// Light curves with fewer samples than this are not searched for a period.
pub const MIN_PERIOD_SAMPLES: usize = 100;

/// Frequency grid oversampling: grid points per expected peak width.
pub const SAMPLES_PER_PEAK: usize = 30;

/// False-alarm probability a Lomb-Scargle peak must beat to count as a period (0.01%).
pub const FALSE_ALARM_PROBABILITY: f64 = 1e-4;

/// Highest searched frequency (Hz) when samples are finer than one second.
/// Roughly a 1.2 s period; finer sampling mostly adds aliasing artifacts.
pub const HIGH_FREQUENCY_CEILING_HZ: f64 = 0.83;

/// Sample intervals (seconds) below this use [`HIGH_FREQUENCY_CEILING_HZ`]
/// instead of the Nyquist frequency.
pub const FINE_SAMPLING_THRESHOLD_SECS: f64 = 1.0;

/// Nyquist factor of the frequency range assumed by the false-alarm level.
pub const FAP_NYQUIST_FACTOR: f64 = 5.0;

/// Relative period bound around a seeded period hint (+/- 20%).
pub const SEED_RELATIVE_BOUND: f64 = 0.2;

/// PDM searches frequencies in [1 / (k * P), k / P] around a candidate period P.
pub const PDM_BAND_FACTOR: f64 = 3.0;

/// PDM frequency grid step (Hz).
pub const PDM_FREQUENCY_STEP_HZ: f64 = 1e-5;

/// Number of phase bins used by the PDM statistic.
pub const PDM_BINS: usize = 10;

/// Row timestamps earlier than the first row by at least this many hours
/// are assumed to have crossed midnight.
pub const ROLLOVER_TOLERANCE_HOURS: f64 = 2.0;

/// Julian dates below this are treated as reduced and offset by it.
pub const REDUCED_JD_OFFSET: f64 = 2_400_000.0;

/// Julian date of the Unix epoch, 1970-01-01T00:00:00Z.
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of cells in the phase coverage bar.
pub const COVERAGE_BAR_WIDTH: usize = 50;

/// Minimum number of frequency grid points to evaluate in parallel.
pub const PARALLEL_GRID_THRESHOLD: usize = 512;

/// Small epsilon to avoid division by zero in floating-point comparisons.
pub const EPSILON: f64 = 1e-12;
