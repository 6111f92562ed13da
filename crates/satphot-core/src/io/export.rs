use std::io::Write;

use crate::lightcurve::{LightCurve, Satellite};

/// Suggested file name for an exported light curve.
pub fn export_file_name(satellite: &Satellite, lc: &LightCurve) -> String {
    format!(
        "{}_{}_{}.txt",
        satellite.norad,
        lc.start_time.format("%Y%m%d_%H%M%S"),
        lc.band
    )
}

/// Write a light curve as a whitespace-separated column file.
///
/// Only the series the curve actually has are written.
pub fn write_light_curve<W: Write>(
    w: &mut W,
    satellite: &Satellite,
    lc: &LightCurve,
) -> std::io::Result<()> {
    writeln!(w, "# NAME = {}", satellite.name)?;
    writeln!(w, "# NORAD = {}", satellite.norad)?;
    writeln!(w, "# COSPAR = {}", satellite.cospar)?;
    writeln!(w, "# Filter = {}", lc.band)?;
    writeln!(w, "# dt = {}", lc.sample_interval)?;
    writeln!(w, "# START = {}", lc.start_time.format("%Y-%m-%d %H:%M:%S%.6f"))?;
    writeln!(w, "# END = {}", lc.end_time.format("%Y-%m-%d %H:%M:%S%.6f"))?;
    if let Some(site) = &lc.site {
        writeln!(w, "# SITE_NAME = {site}")?;
    }
    if let Some(p) = lc.estimated_period {
        writeln!(w, "# PERIOD = {p:.6}")?;
    }

    let s = &lc.samples;
    let optional = [
        ("MagErr", &s.magnitude_error),
        ("Flux", &s.flux),
        ("FluxErr", &s.flux_error),
        ("Az", &s.azimuth),
        ("El", &s.elevation),
        ("Rg", &s.range),
    ];
    let present: Vec<(&str, &Vec<f64>)> = optional
        .iter()
        .filter_map(|(name, series)| series.as_ref().map(|v| (*name, v)))
        .collect();

    write!(w, "# UT Mag")?;
    for (name, _) in &present {
        write!(w, " {name}")?;
    }
    writeln!(w)?;

    for (i, (t, mag)) in s.timestamps.iter().zip(&s.magnitude).enumerate() {
        write!(w, "{} {mag:.4}", t.format("%Y-%m-%dT%H:%M:%S%.3f"))?;
        for (_, series) in &present {
            write!(w, " {:.4}", series[i])?;
        }
        writeln!(w)?;
    }
    Ok(())
}
