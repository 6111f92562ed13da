use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use satphot_core::io::export::{export_file_name, write_light_curve};
use satphot_core::lightcurve::LightCurveId;
use satphot_core::store::CatalogStore;

use super::Context;

#[derive(Args)]
pub struct ExportArgs {
    /// Light curve id
    pub id: LightCurveId,

    /// Output file, or a directory (default: current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &ExportArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let lc = store.light_curve(args.id)?;
    let satellite = store.satellite(lc.satellite_id)?;

    let path = match &args.output {
        Some(output) if !output.is_dir() => output.clone(),
        Some(dir) => dir.join(export_file_name(&satellite, &lc)),
        None => PathBuf::from(export_file_name(&satellite, &lc)),
    };
    let file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);
    write_light_curve(&mut writer, &satellite, &lc)
        .and_then(|()| std::io::Write::flush(&mut writer))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Exported light curve {} to {}", args.id, path.display());
    Ok(())
}
