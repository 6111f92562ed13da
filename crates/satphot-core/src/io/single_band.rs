//! Single-band dialect (`.ph<label>`, e.g. `.phV`, `.phR`, `.phC`).
//!
//! One comment line, a three-line TLE, start and end lines, then
//! `# KEY = value` metadata and an 11 or 13 column data table. The band comes
//! from the extension label unless a `# Filter` line overrides it.

use tracing::debug;

use crate::error::ParseError;

use super::header::{parse_timestamp, Header, HeaderFields};
use super::table::{data_rows, BandColumns, DataRow, RawTable};

/// Header lines before the data table.
pub const HEADER_LINES: usize = 11;

const TLE_LINES: usize = 3;
const COL_TIME: usize = 1;

/// Column positions of one table layout.
struct Layout {
    flux: usize,
    flux_error: usize,
    magnitude: usize,
    magnitude_error: Option<usize>,
    azimuth: usize,
    elevation: usize,
    range: usize,
    columns: usize,
}

static WITH_MAG_ERROR: Layout = Layout {
    flux: 6,
    flux_error: 7,
    magnitude: 8,
    magnitude_error: Some(9),
    azimuth: 10,
    elevation: 11,
    range: 12,
    columns: 13,
};

static WITHOUT_MAG_ERROR: Layout = Layout {
    flux: 5,
    flux_error: 6,
    magnitude: 7,
    magnitude_error: None,
    azimuth: 8,
    elevation: 9,
    range: 10,
    columns: 11,
};

pub fn parse_header(text: &str, band_label: Option<&str>) -> Result<Header, ParseError> {
    let lines: Vec<&str> = text.lines().collect();
    let fixed = 1 + TLE_LINES + 2;
    if lines.len() < fixed {
        return Err(ParseError::TruncatedHeader {
            expected: fixed,
            found: lines.len(),
        });
    }

    let tle = lines[1..=TLE_LINES]
        .iter()
        .map(|l| strip_comment_marker(l))
        .collect::<Vec<_>>()
        .join("\n");
    let start_time = parse_timestamp(strip_wrapped(lines[TLE_LINES + 1]))?;
    let end_time = parse_timestamp(strip_wrapped(lines[TLE_LINES + 2]))?;

    let mut fields = HeaderFields::default();
    for line in &lines[fixed..] {
        let Some((key, value)) = line.split_once(" = ") else {
            continue;
        };
        let value = value.trim();
        match key.trim_end() {
            "# COSPAR" => fields.cospar = Some(value.to_string()),
            "# NORAD" => fields.set_norad(value)?,
            "# NAME" => fields.name = Some(value.to_string()),
            "# dt" => fields.set_dt(value)?,
            "# SITE_NAME" => fields.site = Some(value.to_string()),
            "# Filter" => fields.filter = Some(value.to_string()),
            _ => {}
        }
    }
    if fields.filter.is_none() {
        fields.filter = band_label.map(str::to_string);
    }
    let header = fields.finish(start_time, end_time, Some(tle))?;
    if header.filter.is_none() {
        return Err(ParseError::MissingField("Filter"));
    }
    Ok(header)
}

/// Parse the data table. The layout is chosen from the first row's column
/// count and every other row must have the same layout.
pub fn parse_table(text: &str, header: Header) -> Result<RawTable, ParseError> {
    let rows = data_rows(text, HEADER_LINES)?;
    let layout = select_layout(&rows)?;
    if layout.magnitude_error.is_none() {
        debug!("No magnitude error column, reading without it");
    }
    into_table(header, read_rows(&rows, layout)?)
}

/// Layout matching the first row; a row of the other layout (or too short
/// for either) is a column-count error.
fn select_layout(rows: &[DataRow<'_>]) -> Result<&'static Layout, ParseError> {
    let first = rows.first().ok_or(ParseError::EmptyTable)?;
    let layout = if first.fields.len() >= WITH_MAG_ERROR.columns {
        &WITH_MAG_ERROR
    } else {
        &WITHOUT_MAG_ERROR
    };
    for row in rows {
        row.require(layout.columns)?;
        if layout.magnitude_error.is_none() && row.fields.len() >= WITH_MAG_ERROR.columns {
            return Err(ParseError::ColumnCount {
                row: row.line,
                expected: layout.columns,
                found: row.fields.len(),
            });
        }
    }
    Ok(layout)
}

struct Columns {
    time_of_day: Vec<chrono::NaiveTime>,
    flux: Vec<f64>,
    flux_error: Vec<f64>,
    magnitude: Vec<f64>,
    magnitude_error: Option<Vec<f64>>,
    azimuth: Vec<f64>,
    elevation: Vec<f64>,
    range: Vec<f64>,
}

fn read_rows(rows: &[DataRow<'_>], layout: &Layout) -> Result<Columns, ParseError> {
    let n = rows.len();
    let mut cols = Columns {
        time_of_day: Vec::with_capacity(n),
        flux: Vec::with_capacity(n),
        flux_error: Vec::with_capacity(n),
        magnitude: Vec::with_capacity(n),
        magnitude_error: layout.magnitude_error.map(|_| Vec::with_capacity(n)),
        azimuth: Vec::with_capacity(n),
        elevation: Vec::with_capacity(n),
        range: Vec::with_capacity(n),
    };

    for row in rows {
        cols.time_of_day.push(row.time(COL_TIME)?);
        cols.flux.push(row.number(layout.flux)?);
        cols.flux_error.push(row.number(layout.flux_error)?);
        cols.magnitude.push(row.number(layout.magnitude)?);
        if let (Some(col), Some(errors)) = (layout.magnitude_error, cols.magnitude_error.as_mut()) {
            errors.push(row.number(col)?);
        }
        cols.azimuth.push(row.number(layout.azimuth)?);
        cols.elevation.push(row.number(layout.elevation)?);
        cols.range.push(row.number(layout.range)?);
    }
    Ok(cols)
}

fn into_table(header: Header, cols: Columns) -> Result<RawTable, ParseError> {
    let band = header
        .filter
        .clone()
        .ok_or(ParseError::MissingField("Filter"))?;
    Ok(RawTable {
        header,
        time_of_day: cols.time_of_day,
        bands: vec![BandColumns {
            band,
            flux: cols.flux,
            flux_error: Some(cols.flux_error),
            magnitude: cols.magnitude,
            magnitude_error: cols.magnitude_error,
        }],
        azimuth: cols.azimuth,
        elevation: cols.elevation,
        range: cols.range,
    })
}

/// `# 1 25544U ...` -> `1 25544U ...`
fn strip_comment_marker(line: &str) -> &str {
    line.trim_end().trim_start_matches('#').trim_start()
}

/// `# 2025-01-30 17:36:50.807771;` -> `2025-01-30 17:36:50.807771`
fn strip_wrapped(line: &str) -> &str {
    strip_comment_marker(line).trim_end_matches(|c: char| !c.is_ascii_digit())
}
