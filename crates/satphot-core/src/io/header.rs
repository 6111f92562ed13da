use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::ParseError;
use crate::lightcurve::SatelliteHeader;

/// Metadata block at the top of a photometry file.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    pub satellite: SatelliteHeader,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Nominal seconds between samples (`dt`).
    pub sample_interval: f64,
    pub site: Option<String>,
    /// Band declared in the header; overrides the filename label.
    pub filter: Option<String>,
    /// Orbital elements in effect for the pass.
    pub tle: Option<String>,
}

impl Header {
    /// Calendar date every row time-of-day is attached to.
    pub fn start_date(&self) -> NaiveDate {
        self.start_time.date_naive()
    }
}

/// Header fields collected while scanning, before required ones are checked.
#[derive(Default)]
pub(super) struct HeaderFields {
    pub cospar: Option<String>,
    pub norad: Option<u32>,
    pub name: Option<String>,
    pub dt: Option<f64>,
    pub site: Option<String>,
    pub filter: Option<String>,
}

impl HeaderFields {
    pub fn set_norad(&mut self, value: &str) -> Result<(), ParseError> {
        let value = value.trim();
        let norad = value.parse::<u32>().map_err(|_| ParseError::InvalidField {
            field: "NORAD",
            value: value.to_string(),
        })?;
        self.norad = Some(norad);
        Ok(())
    }

    pub fn set_dt(&mut self, value: &str) -> Result<(), ParseError> {
        let value = value.trim();
        match value.parse::<f64>() {
            Ok(dt) if dt.is_finite() && dt > 0.0 => {
                self.dt = Some(dt);
                Ok(())
            }
            _ => Err(ParseError::InvalidField {
                field: "dt",
                value: value.to_string(),
            }),
        }
    }

    pub fn finish(
        self,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        tle: Option<String>,
    ) -> Result<Header, ParseError> {
        Ok(Header {
            satellite: SatelliteHeader {
                norad: self.norad.ok_or(ParseError::MissingField("NORAD"))?,
                cospar: self.cospar.ok_or(ParseError::MissingField("COSPAR"))?,
                name: self.name.ok_or(ParseError::MissingField("NAME"))?,
            },
            start_time,
            end_time,
            sample_interval: self.dt.ok_or(ParseError::MissingField("dt"))?,
            site: self.site.filter(|s| !s.is_empty()),
            filter: self.filter.filter(|s| !s.is_empty()),
            tle,
        })
    }
}

/// Parse a `YYYY-MM-DD HH:MM:SS[.ffffff]` prefix; anything after the time is ignored.
pub fn parse_timestamp(line: &str) -> Result<DateTime<Utc>, ParseError> {
    let mut tokens = line.split_whitespace();
    let (Some(date), Some(time)) = (tokens.next(), tokens.next()) else {
        return Err(ParseError::InvalidTimestamp(line.to_string()));
    };
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| ParseError::InvalidTimestamp(line.to_string()))?;
    let time = parse_time_of_day(time)?;
    Ok(NaiveDateTime::new(date, time).and_utc())
}

/// Parse an `HH:MM:SS[.fff]` data-row time.
pub fn parse_time_of_day(token: &str) -> Result<NaiveTime, ParseError> {
    NaiveTime::parse_from_str(token, "%H:%M:%S%.f")
        .map_err(|_| ParseError::InvalidTimestamp(token.to_string()))
}

/// Value after the first `=` of a `KEY = value` line.
pub(super) fn value_after_equals(line: &str) -> Option<&str> {
    line.split_once('=').map(|(_, v)| v.trim())
}
