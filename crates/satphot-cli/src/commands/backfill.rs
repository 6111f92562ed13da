use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Args;
use satphot_core::pipeline::run_backfill;
use tracing::warn;

use super::{BarReporter, Context};
use crate::summary;

#[derive(Args)]
pub struct BackfillArgs {
    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

/// Re-estimate every stored period. Ctrl-C stops after the current curve.
pub fn run(args: &BackfillArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
        warn!("Cannot install Ctrl-C handler: {e}");
    }

    let backfill = run_backfill(&mut store, &ctx.config.lomb_scargle).cancel_on(cancel);
    let result = if args.quiet {
        backfill.run()
    } else {
        backfill.run_reported(&BarReporter::new())
    };
    let summary = result.context("Backfill failed")?;

    summary::print_backfill_summary(&summary);
    Ok(())
}
