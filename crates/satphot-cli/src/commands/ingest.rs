use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use satphot_core::pipeline::{ingest_files_reported, remove_empty_satellites};

use super::{BarReporter, Context};
use crate::summary;

#[derive(Args)]
pub struct IngestArgs {
    /// Photometry files to ingest
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

pub fn run(args: &IngestArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let reporter = BarReporter::new();
    let report = ingest_files_reported(&mut store, &args.files, &ctx.config, &reporter)
        .context("Catalog update failed")?;
    summary::print_batch_report(&report);
    Ok(())
}

pub fn run_cleanup(ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let removed = remove_empty_satellites(&mut store).context("Cleanup failed")?;
    if removed.is_empty() {
        println!("No empty satellites");
    }
    for sat in &removed {
        println!("Removed {} {} ({})", sat.norad, sat.name, sat.cospar);
    }
    Ok(())
}
