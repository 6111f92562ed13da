mod commands;
mod summary;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::Context;

#[derive(Parser)]
#[command(name = "satphot", about = "Satellite light-curve catalog and period analysis")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Catalog file (JSON)
    #[arg(long, global = true, default_value = "catalog.json")]
    catalog: PathBuf,

    /// Analysis config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest photometry files (.phc, .phV, .phR, ...)
    Ingest(commands::ingest::IngestArgs),
    /// List satellites, or the light curves of one satellite
    List(commands::list::ListArgs),
    /// Estimate and store the period of a light curve
    Period(commands::period::PeriodArgs),
    /// Refine a period with phase dispersion minimization
    Refine(commands::period::RefineArgs),
    /// Set a light curve's period by hand
    SetPeriod(commands::period::SetPeriodArgs),
    /// Re-estimate the period of every stored light curve
    Backfill(commands::backfill::BackfillArgs),
    /// Remove satellites that have no light curves
    Cleanup,
    /// Write a report of the observations in a date range
    Report(commands::report::ReportArgs),
    /// Export a light curve as a text table
    Export(commands::export::ExportArgs),
    /// Phases of Julian dates for an ephemeris
    Phase(commands::phase::PhaseArgs),
    /// Phase coverage bar of an observation
    Coverage(commands::phase::CoverageArgs),
    /// Print or save the default analysis config
    Config(commands::config::ConfigArgs),
    /// Light-curve or periodogram plot data as JSON
    Plot(commands::plot::PlotArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let ctx = Context::load(cli.catalog, cli.config.as_deref())?;

    match &cli.command {
        Commands::Ingest(args) => commands::ingest::run(args, &ctx),
        Commands::List(args) => commands::list::run(args, &ctx),
        Commands::Period(args) => commands::period::run(args, &ctx),
        Commands::Refine(args) => commands::period::run_refine(args, &ctx),
        Commands::SetPeriod(args) => commands::period::run_set_period(args, &ctx),
        Commands::Backfill(args) => commands::backfill::run(args, &ctx),
        Commands::Cleanup => commands::ingest::run_cleanup(&ctx),
        Commands::Report(args) => commands::report::run(args, &ctx),
        Commands::Export(args) => commands::export::run(args, &ctx),
        Commands::Phase(args) => commands::phase::run(args),
        Commands::Coverage(args) => commands::phase::run_coverage(args),
        Commands::Config(args) => commands::config::run(args),
        Commands::Plot(args) => commands::plot::run(args, &ctx),
    }
}
