use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::ParseError;
use crate::lightcurve::{LightCurveDraft, Samples};

use super::header::{parse_time_of_day, Header};

/// Columns of one photometric band.
#[derive(Clone, Debug, PartialEq)]
pub struct BandColumns {
    pub band: String,
    pub flux: Vec<f64>,
    pub flux_error: Option<Vec<f64>>,
    pub magnitude: Vec<f64>,
    pub magnitude_error: Option<Vec<f64>>,
}

/// Dialect-independent content of a photometry file.
#[derive(Clone, Debug, PartialEq)]
pub struct RawTable {
    pub header: Header,
    /// Row times, still relative to the header start date.
    pub time_of_day: Vec<NaiveTime>,
    pub bands: Vec<BandColumns>,
    pub azimuth: Vec<f64>,
    pub elevation: Vec<f64>,
    pub range: Vec<f64>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.time_of_day.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_of_day.is_empty()
    }

    /// Build one light curve per band, with absolute timestamps.
    pub fn into_drafts(self, rollover_tolerance_hours: f64) -> Vec<LightCurveDraft> {
        let tolerance = Duration::milliseconds((rollover_tolerance_hours * 3_600_000.0) as i64);
        let timestamps =
            reconstruct_timestamps(self.header.start_date(), &self.time_of_day, tolerance);
        let header = self.header;

        self.bands
            .into_iter()
            .map(|band| LightCurveDraft {
                band: band.band,
                start_time: header.start_time,
                end_time: header.end_time,
                sample_interval: header.sample_interval,
                site: header.site.clone(),
                tle_snapshot: header.tle.clone(),
                samples: Samples {
                    timestamps: timestamps.clone(),
                    magnitude: band.magnitude,
                    magnitude_error: band.magnitude_error,
                    flux: Some(band.flux),
                    flux_error: band.flux_error,
                    azimuth: Some(self.azimuth.clone()),
                    elevation: Some(self.elevation.clone()),
                    range: Some(self.range.clone()),
                },
            })
            .collect()
    }
}

/// Attach row times to `date`, moving rows that fall `tolerance` or more
/// before the first row onto the following day (the pass crossed midnight).
pub fn reconstruct_timestamps(
    date: NaiveDate,
    times: &[NaiveTime],
    tolerance: Duration,
) -> Vec<DateTime<Utc>> {
    let naive: Vec<DateTime<Utc>> = times
        .iter()
        .map(|&t| NaiveDateTime::new(date, t).and_utc())
        .collect();
    let Some(&t0) = naive.first() else {
        return naive;
    };
    naive
        .into_iter()
        .map(|t| if t0 - t >= tolerance { t + Duration::days(1) } else { t })
        .collect()
}

/// One whitespace-split line of the data table.
pub(super) struct DataRow<'a> {
    /// 1-based line number in the file.
    pub line: usize,
    pub fields: Vec<&'a str>,
}

impl DataRow<'_> {
    pub fn require(&self, columns: usize) -> Result<(), ParseError> {
        if self.fields.len() < columns {
            return Err(ParseError::ColumnCount {
                row: self.line,
                expected: columns,
                found: self.fields.len(),
            });
        }
        Ok(())
    }

    pub fn number(&self, column: usize) -> Result<f64, ParseError> {
        let value = self.field(column)?;
        value.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
            row: self.line,
            column,
            value: value.to_string(),
        })
    }

    pub fn time(&self, column: usize) -> Result<NaiveTime, ParseError> {
        parse_time_of_day(self.field(column)?)
    }

    fn field(&self, column: usize) -> Result<&str, ParseError> {
        self.fields
            .get(column)
            .copied()
            .ok_or(ParseError::ColumnCount {
                row: self.line,
                expected: column + 1,
                found: self.fields.len(),
            })
    }
}

/// Data rows after a fixed header, skipping blank and `#` comment lines.
pub(super) fn data_rows(text: &str, skip_lines: usize) -> Result<Vec<DataRow<'_>>, ParseError> {
    let rows: Vec<DataRow<'_>> = text
        .lines()
        .enumerate()
        .skip(skip_lines)
        .filter_map(|(i, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                None
            } else {
                Some(DataRow {
                    line: i + 1,
                    fields: trimmed.split_whitespace().collect(),
                })
            }
        })
        .collect();
    if rows.is_empty() {
        return Err(ParseError::EmptyTable);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn comment_and_blank_lines_are_not_rows() {
        let text = "h1\nh2\n# note\n\n12:00:00 1 2\n12:00:01 3 4\n";
        let rows = data_rows(text, 2).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 5);
        assert_eq!(rows[1].fields, vec!["12:00:01", "3", "4"]);
    }

    #[test]
    fn no_rows_is_empty_table() {
        assert_eq!(data_rows("a\nb\n", 2).err(), Some(ParseError::EmptyTable));
    }

    #[test]
    fn small_backward_step_is_not_a_rollover() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 30).unwrap();
        let times = [hms(12, 0, 0), hms(11, 0, 0)];
        let ts = reconstruct_timestamps(date, &times, Duration::hours(2));
        assert_eq!(ts[1].date_naive(), date);
    }
}
