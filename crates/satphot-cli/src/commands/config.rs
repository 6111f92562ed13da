use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use satphot_core::config::AnalysisConfig;

use super::write_output;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print or save the default AnalysisConfig as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let toml_str = toml::to_string_pretty(&AnalysisConfig::default())?;
    write_output(args.output.as_deref(), &toml_str)
}
