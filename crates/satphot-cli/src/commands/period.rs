use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use satphot_core::lightcurve::LightCurveId;
use satphot_core::pipeline::{compute_period, refine, set_manual_period};

use super::{write_output, Context};

#[derive(Args)]
pub struct PeriodArgs {
    /// Light curve id
    pub id: LightCurveId,

    /// Search only near this period (seconds)
    #[arg(long)]
    pub seed: Option<f64>,
}

#[derive(Args)]
pub struct RefineArgs {
    /// Light curve id
    pub id: LightCurveId,

    /// Candidate period in seconds (defaults to the stored period)
    #[arg(short, long)]
    pub period: Option<f64>,

    /// Write the folded curves as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct SetPeriodArgs {
    /// Light curve id
    pub id: LightCurveId,

    /// Period in seconds
    pub seconds: f64,
}

pub fn run(args: &PeriodArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let estimate = compute_period(&mut store, args.id, args.seed, &ctx.config)
        .with_context(|| format!("Failed to estimate period of light curve {}", args.id))?;
    println!("Light curve {}: {estimate}", args.id);
    Ok(())
}

pub fn run_refine(args: &RefineArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let refined = refine(&store, args.id, args.period, &ctx.config)
        .with_context(|| format!("Failed to refine period of light curve {}", args.id))?;

    println!("Candidate: {:.3} s", refined.candidate);
    match (refined.refined, refined.theta) {
        (Some(p), Some(theta)) => println!("Refined:   {p:.3} s (theta {theta:.4})"),
        _ => println!("Refined:   none (dispersion undefined over the search band)"),
    }

    if let Some(output) = &args.output {
        let json = serde_json::to_string_pretty(&refined)?;
        write_output(Some(output), &json)?;
    }
    Ok(())
}

pub fn run_set_period(args: &SetPeriodArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    set_manual_period(&mut store, args.id, args.seconds)
        .with_context(|| format!("Failed to set period of light curve {}", args.id))?;
    println!("Light curve {}: {:.3} s (manual)", args.id, args.seconds);
    Ok(())
}
