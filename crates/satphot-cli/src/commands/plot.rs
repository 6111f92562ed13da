use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use satphot_core::lightcurve::LightCurveId;
use satphot_core::plot::{light_curve_plot, periodogram_plot, PlotMode};

use super::{write_output, Context};

/// Default window of `--mode multi`: curves started within 5 minutes.
const DEFAULT_MULTI_WINDOW_SECS: f64 = 300.0;

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Only the selected curve
    Single,
    /// Every curve of the satellite started near the selected one
    Multi,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PlotKind {
    /// Magnitude against time
    Curve,
    /// Lomb-Scargle power against frequency
    Periodogram,
}

#[derive(Args)]
pub struct PlotArgs {
    /// Light curve id
    pub id: LightCurveId,

    #[arg(short, long, value_enum, default_value_t = PlotKind::Curve)]
    pub kind: PlotKind,

    #[arg(short, long, value_enum, default_value_t = ModeArg::Single)]
    pub mode: ModeArg,

    /// Start-time window of multi mode, in seconds
    #[arg(short, long, default_value_t = DEFAULT_MULTI_WINDOW_SECS)]
    pub window: f64,

    /// Write JSON to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &PlotArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;

    let json = match args.kind {
        PlotKind::Curve => {
            let mode = match args.mode {
                ModeArg::Single => PlotMode::Single,
                ModeArg::Multi => PlotMode::Multi {
                    window_secs: args.window,
                },
            };
            serde_json::to_string_pretty(&light_curve_plot(&store, args.id, mode)?)?
        }
        PlotKind::Periodogram => {
            match periodogram_plot(&store, args.id, &ctx.config.lomb_scargle)? {
                Ok(periodogram) => serde_json::to_string_pretty(&periodogram)?,
                Err(reason) => bail!("No periodogram for light curve {}: {reason}", args.id),
            }
        }
    };
    write_output(args.output.as_deref(), &json)
}
