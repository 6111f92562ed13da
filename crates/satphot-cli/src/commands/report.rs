use std::path::PathBuf;

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use clap::Args;
use satphot_core::report::observation_report;

use super::Context;

#[derive(Args)]
pub struct ReportArgs {
    /// First day (YYYY-MM-DD)
    #[arg(long)]
    pub from: NaiveDate,

    /// Last day, inclusive (defaults to --from)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Output file, or a directory to hold phot_report_<from>.txt
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &ReportArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let report = observation_report(&store, args.from, args.to.unwrap_or(args.from))?;

    let Some(output) = &args.output else {
        print!("{report}");
        return Ok(());
    };
    let path = if output.is_dir() {
        output.join(report.file_name())
    } else {
        output.clone()
    };
    let mut file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    report
        .write_text(&mut file)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{} observations saved to {}", report.rows.len(), path.display());
    Ok(())
}
