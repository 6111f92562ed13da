//! Serializable plot data for an external renderer.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::LombScargleConfig;
use crate::error::Result;
use crate::lightcurve::{seconds_between, LightCurve, LightCurveId, Satellite};
use crate::period::{periodogram, Periodogram, UndeterminedReason};
use crate::store::CatalogStore;

/// Padding (mag) around the plotted magnitudes when there are no error bars.
const DEFAULT_MAG_MARGIN: f64 = 0.1;

/// Which curves go into a light-curve plot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PlotMode {
    /// Only the selected curve.
    #[default]
    Single,
    /// Every curve of the same satellite starting within `window_secs` of it,
    /// e.g. the bands of one simultaneous observation.
    Multi { window_secs: f64 },
}

/// Display colour of a band.
pub fn band_color(band: &str) -> &'static str {
    match band {
        "B" => "blue",
        "V" => "green",
        "R" => "red",
        "C" => "black",
        _ => "gray",
    }
}

pub fn plot_title(satellite: &Satellite, lc: &LightCurve) -> String {
    format!(
        "Satellite Name:{}, NORAD:{}, COSPAR:{}, LC start={}  dt={}  Filter={}",
        satellite.name,
        satellite.norad,
        satellite.cospar,
        lc.start_time.format("%Y-%m-%d %H:%M:%S%.6f"),
        lc.sample_interval,
        lc.band
    )
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CurveTrace {
    pub light_curve: LightCurveId,
    pub band: String,
    pub color: String,
    pub time: Vec<DateTime<Utc>>,
    pub magnitude: Vec<f64>,
    pub magnitude_error: Option<Vec<f64>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LightCurvePlot {
    pub title: String,
    pub traces: Vec<CurveTrace>,
    /// Magnitude axis from faint (top value) to bright.
    pub magnitude_range: (f64, f64),
    /// Elevation and azimuth tracks of the selected curve, in degrees.
    pub elevation: Option<Vec<f64>>,
    pub azimuth: Option<Vec<f64>>,
}

/// Curves of the same satellite starting within `window_secs` of `id`,
/// including `id` itself, ordered by start.
pub fn companion_curves<S: CatalogStore + ?Sized>(
    store: &S,
    id: LightCurveId,
    window_secs: f64,
) -> Result<Vec<LightCurve>> {
    let selected = store.light_curve(id)?;
    let mut curves = Vec::new();
    for other in store.light_curves_of(selected.satellite_id) {
        let lc = store.light_curve(other)?;
        if seconds_between(selected.start_time, lc.start_time).abs() < window_secs {
            curves.push(lc);
        }
    }
    curves.sort_by_key(|lc| (lc.start_time, lc.id));
    Ok(curves)
}

pub fn light_curve_plot<S: CatalogStore + ?Sized>(
    store: &S,
    id: LightCurveId,
    mode: PlotMode,
) -> Result<LightCurvePlot> {
    let selected = store.light_curve(id)?;
    let satellite = store.satellite(selected.satellite_id)?;
    let curves = match mode {
        PlotMode::Single => vec![selected.clone()],
        PlotMode::Multi { window_secs } => companion_curves(store, id, window_secs)?,
    };

    let (mut faint, mut bright) = (f64::NEG_INFINITY, f64::INFINITY);
    for lc in &curves {
        let margin = lc
            .samples
            .magnitude_error
            .as_ref()
            .and_then(|e| e.iter().copied().reduce(f64::max))
            .unwrap_or(DEFAULT_MAG_MARGIN);
        for &m in &lc.samples.magnitude {
            faint = faint.max(m + margin);
            bright = bright.min(m - margin);
        }
    }

    let traces = curves
        .into_iter()
        .map(|lc| CurveTrace {
            light_curve: lc.id,
            color: band_color(&lc.band).to_string(),
            band: lc.band,
            time: lc.samples.timestamps,
            magnitude: lc.samples.magnitude,
            magnitude_error: lc.samples.magnitude_error,
        })
        .collect();

    Ok(LightCurvePlot {
        title: plot_title(&satellite, &selected),
        traces,
        magnitude_range: (faint, bright),
        elevation: selected.samples.elevation,
        azimuth: selected.samples.azimuth,
    })
}

/// Lomb-Scargle periodogram of a stored light curve.
pub fn periodogram_plot<S: CatalogStore + ?Sized>(
    store: &S,
    id: LightCurveId,
    config: &LombScargleConfig,
) -> Result<std::result::Result<Periodogram, UndeterminedReason>> {
    let lc = store.light_curve(id)?;
    Ok(periodogram(&lc, config))
}
