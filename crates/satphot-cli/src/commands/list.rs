use anyhow::{bail, Result};
use clap::Args;
use satphot_core::store::CatalogStore;

use super::Context;
use crate::summary;

#[derive(Args)]
pub struct ListArgs {
    /// Show the light curves of this NORAD number
    #[arg(short, long)]
    pub norad: Option<u32>,
}

pub fn run(args: &ListArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;

    let Some(norad) = args.norad else {
        let rows: Vec<_> = store
            .satellites()
            .into_iter()
            .map(|sat| {
                let curves = store.light_curves_of(sat.id).len();
                (sat, curves)
            })
            .collect();
        summary::print_satellites(&rows);
        return Ok(());
    };

    let Some(satellite) = store.find_satellite_by_norad(norad) else {
        bail!("No satellite with NORAD {norad} in {}", ctx.catalog.display());
    };
    let mut curves = Vec::new();
    for id in store.light_curves_of(satellite.id) {
        curves.push(store.light_curve(id)?);
    }
    curves.sort_by_key(|lc| (lc.start_time, lc.band.clone()));
    summary::print_light_curves(&satellite, &curves);
    Ok(())
}
