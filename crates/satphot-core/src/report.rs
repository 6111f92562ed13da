//! Text report of the observations made over a date range.

use std::fmt;
use std::io::Write;

use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::error::{Result, SatphotError};
use crate::lightcurve::{LightCurveId, Satellite};
use crate::store::CatalogStore;

#[derive(Clone, Debug, PartialEq)]
pub struct ReportRow {
    pub satellite: Satellite,
    pub light_curve: LightCurveId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub band: String,
    pub samples: usize,
    pub site: Option<String>,
    pub period: String,
}

/// Light curves whose start falls on a day in `[from, to]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ObservationReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Ordered by start time.
    pub rows: Vec<ReportRow>,
}

pub fn observation_report<S: CatalogStore + ?Sized>(
    store: &S,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<ObservationReport> {
    if from > to {
        return Err(SatphotError::InvalidArgument(format!(
            "report range is empty: {from} is after {to}"
        )));
    }
    let begin = from.and_hms_opt(0, 0, 0).map(|t| t.and_utc());
    let end = to
        .checked_add_days(Days::new(1))
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc());
    let (Some(begin), Some(end)) = (begin, end) else {
        return Err(SatphotError::InvalidArgument(format!(
            "report range {from}..{to} is out of range"
        )));
    };

    let mut rows = Vec::new();
    for id in store.light_curve_ids() {
        let lc = store.light_curve(id)?;
        if lc.start_time < begin || lc.start_time >= end {
            continue;
        }
        rows.push(ReportRow {
            satellite: store.satellite(lc.satellite_id)?,
            light_curve: lc.id,
            start_time: lc.start_time,
            end_time: lc.end_time,
            samples: lc.len(),
            period: lc.period_label(),
            band: lc.band,
            site: lc.site,
        });
    }
    rows.sort_by_key(|r| (r.start_time, r.satellite.norad, r.band.clone()));

    Ok(ObservationReport { from, to, rows })
}

impl ObservationReport {
    /// `phot_report_<from>.txt`
    pub fn file_name(&self) -> String {
        format!("phot_report_{}.txt", self.from.format("%Y-%m-%d"))
    }

    pub fn write_text<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        write!(w, "{self}")
    }
}

impl fmt::Display for ObservationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Photometric observations {} .. {}", self.from, self.to)?;
        writeln!(f, "Light curves: {}", self.rows.len())?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<8} {:<12} {:<24} {:<19} {:<19} {:<4} {:>7} {:<12} {}",
            "NORAD", "COSPAR", "NAME", "UT start", "UT end", "Band", "Points", "Site", "Period"
        )?;
        for r in &self.rows {
            writeln!(
                f,
                "{:<8} {:<12} {:<24} {:<19} {:<19} {:<4} {:>7} {:<12} {}",
                r.satellite.norad,
                r.satellite.cospar,
                r.satellite.name,
                r.start_time.format("%Y-%m-%d %H:%M:%S"),
                r.end_time.format("%Y-%m-%d %H:%M:%S"),
                r.band,
                r.samples,
                r.site.as_deref().unwrap_or("-"),
                r.period,
            )?;
        }
        Ok(())
    }
}
