use anyhow::Result;
use clap::Args;
use satphot_core::phase::{phases, ObservationSpan};

#[derive(Args)]
pub struct PhaseArgs {
    /// Period in days, the unit of the Julian dates
    #[arg(short, long)]
    pub period: f64,

    /// Epoch of phase zero (JD, or reduced JD below 2400000)
    #[arg(short, long)]
    pub epoch: f64,

    /// Julian dates to fold
    #[arg(required = true, allow_negative_numbers = true)]
    pub times: Vec<f64>,
}

#[derive(Args)]
pub struct CoverageArgs {
    /// Period in days, the unit of the Julian dates
    #[arg(short, long)]
    pub period: f64,

    /// Epoch of phase zero (JD, or reduced JD below 2400000)
    #[arg(short, long)]
    pub epoch: f64,

    /// Observation start (JD)
    #[arg(long)]
    pub start: f64,

    /// Observation end (JD)
    #[arg(long)]
    pub end: f64,
}

pub fn run(args: &PhaseArgs) -> Result<()> {
    let folded = phases(args.times.as_slice(), args.period, args.epoch)?;
    for (t, p) in args.times.iter().zip(&folded) {
        println!("{t:.6}  {p:.6}");
    }
    Ok(())
}

pub fn run_coverage(args: &CoverageArgs) -> Result<()> {
    let span = ObservationSpan::new(args.start, args.end);
    let start = span.phase_start(args.period, args.epoch)?;
    let end = span.phase_end(args.period, args.epoch)?;
    let bar = span.coverage_bar(args.period, args.epoch)?;
    println!("{start:.3} .. {end:.3}");
    println!("|{bar}|");
    Ok(())
}
