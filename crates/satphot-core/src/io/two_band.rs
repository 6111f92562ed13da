//! Legacy two-band dialect (`.phc`): simultaneous B and V photometry.
//!
//! ```text
//! 2025-01-30 17:19:41.000000        <- start
//! 2025-01-30 17:26:25.000000        <- end
//! COSPAR ID = 2022-002A
//! NORAD ID = 51511
//! NAME = STARLINK-3259
//! dt = 0.100
//! Time  impB impV fonB fonV mB mV Az El Rg
//! 17:19:41.000 ...                  <- data, 10 columns
//! ```

use crate::error::ParseError;

use super::header::{parse_timestamp, value_after_equals, Header, HeaderFields};
use super::table::{data_rows, BandColumns, RawTable};

/// Header lines before the data table.
pub const HEADER_LINES: usize = 7;

/// Band letters in column order.
pub const BANDS: [&str; 2] = ["B", "V"];

const COL_TIME: usize = 0;
const COL_IMPULSE: [usize; 2] = [1, 2];
const COL_MAG: [usize; 2] = [5, 6];
const COL_AZ: usize = 7;
const COL_EL: usize = 8;
const COL_RANGE: usize = 9;
const COLUMNS: usize = 10;

pub fn parse_header(text: &str) -> Result<Header, ParseError> {
    let mut lines = text.lines();
    let (Some(start), Some(end)) = (lines.next(), lines.next()) else {
        return Err(ParseError::TruncatedHeader {
            expected: 2,
            found: text.lines().count(),
        });
    };
    let start_time = parse_timestamp(start)?;
    let end_time = parse_timestamp(end)?;

    let mut fields = HeaderFields::default();
    for line in lines {
        let Some(value) = value_after_equals(line) else {
            continue;
        };
        if line.starts_with("COSPAR ID") {
            fields.cospar = Some(value.to_string());
        } else if line.starts_with("NORAD ID") {
            fields.set_norad(value)?;
        } else if line.starts_with("NAME") {
            fields.name = Some(value.to_string());
        } else if line.starts_with("dt") {
            fields.set_dt(value)?;
        }
    }
    fields.finish(start_time, end_time, None)
}

pub fn parse_table(text: &str, header: Header) -> Result<RawTable, ParseError> {
    let rows = data_rows(text, HEADER_LINES)?;
    let n = rows.len();

    let mut time_of_day = Vec::with_capacity(n);
    let mut impulse = [Vec::with_capacity(n), Vec::with_capacity(n)];
    let mut magnitude = [Vec::with_capacity(n), Vec::with_capacity(n)];
    let mut azimuth = Vec::with_capacity(n);
    let mut elevation = Vec::with_capacity(n);
    let mut range = Vec::with_capacity(n);

    for row in &rows {
        row.require(COLUMNS)?;
        time_of_day.push(row.time(COL_TIME)?);
        for b in 0..BANDS.len() {
            impulse[b].push(row.number(COL_IMPULSE[b])?);
            magnitude[b].push(row.number(COL_MAG[b])?);
        }
        azimuth.push(row.number(COL_AZ)?);
        elevation.push(row.number(COL_EL)?);
        range.push(row.number(COL_RANGE)?);
    }

    let bands = BANDS
        .iter()
        .zip(impulse.into_iter().zip(magnitude))
        .map(|(band, (flux, magnitude))| BandColumns {
            band: band.to_string(),
            flux,
            flux_error: None,
            magnitude,
            magnitude_error: None,
        })
        .collect();

    Ok(RawTable {
        header,
        time_of_day,
        bands,
        azimuth,
        elevation,
        range,
    })
}
