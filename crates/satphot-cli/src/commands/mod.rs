pub mod backfill;
pub mod config;
pub mod export;
pub mod ingest;
pub mod list;
pub mod period;
pub mod phase;
pub mod plot;
pub mod report;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context as _, Result};
use indicatif::{ProgressBar, ProgressStyle};
use satphot_core::config::AnalysisConfig;
use satphot_core::pipeline::{PipelineStage, ProgressReporter};
use satphot_core::store::JsonStore;

/// Settings shared by every subcommand.
pub struct Context {
    pub catalog: PathBuf,
    pub config: AnalysisConfig,
}

impl Context {
    pub fn load(catalog: PathBuf, config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                toml::from_str(&contents).context("Invalid analysis config")?
            }
            None => AnalysisConfig::default(),
        };
        Ok(Self { catalog, config })
    }

    pub fn open_store(&self) -> Result<JsonStore> {
        JsonStore::open(&self.catalog)
            .with_context(|| format!("Failed to open catalog {}", self.catalog.display()))
    }
}

/// Write `contents` to `path`, or to stdout without one.
pub fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, contents)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Saved to {}", path.display());
        }
        None => print!("{contents}"),
    }
    Ok(())
}

/// Drives an indicatif bar from pipeline progress, one bar per stage.
#[derive(Default)]
pub struct BarReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl BarReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        let Some(total) = total_items else {
            return;
        };
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar().template("{msg} [{bar:40}] {pos}/{len}") {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_message(stage.to_string());
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn advance(&self, items_done: usize) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                bar.set_position(items_done as u64);
            }
        }
    }

    fn finish_stage(&self) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }
}
