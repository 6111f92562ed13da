//! Photometry file parsing.
//!
//! Every dialect is parsed into a [`RawTable`], which turns into one
//! [`LightCurveDraft`](crate::lightcurve::LightCurveDraft) per band.

mod dialect;
pub mod export;
mod file;
mod header;
pub mod single_band;
mod table;
pub mod two_band;

pub use dialect::Dialect;
pub use file::{decode, PhotometryFile};
pub use header::{parse_time_of_day, parse_timestamp, Header};
pub use table::{reconstruct_timestamps, BandColumns, RawTable};

use crate::error::ParseError;

/// Detect the dialect of an upload and parse it completely.
pub fn parse_photometry(bytes: &[u8], filename: &str) -> Result<RawTable, ParseError> {
    let text = decode(bytes)?;
    Dialect::detect(filename, text)?.parse(text)
}
