use console::Style;
use satphot_core::lightcurve::{LightCurve, Satellite};
use satphot_core::pipeline::{BackfillSummary, BatchReport, IngestOutcome};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    ok: Style,
    failed: Style,
    skipped: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            ok: Style::new().green(),
            failed: Style::new().red(),
            skipped: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }

    fn print_title(&self, title: &str) {
        println!();
        println!("  {}", self.title.apply_to(title));
        println!(
            "  {}",
            self.title.apply_to("\u{2550}".repeat(title.chars().count()))
        );
        println!();
    }

    fn print_field(&self, label: &str, value: impl std::fmt::Display) {
        println!("  {:<14}{}", self.label.apply_to(label), self.value.apply_to(value));
    }
}

pub fn print_batch_report(report: &BatchReport) {
    let s = Styles::new();
    s.print_title("Ingestion");

    for file in &report.files {
        println!("  {}", s.path.apply_to(&file.filename));
        match &file.outcome {
            IngestOutcome::Ingested {
                records_created,
                skipped_bands,
                ..
            } => {
                let ids: Vec<String> = records_created.iter().map(|id| id.to_string()).collect();
                if ids.is_empty() {
                    println!("    {}", s.skipped.apply_to("no new light curves"));
                } else {
                    println!("    {} {}", s.ok.apply_to("created"), ids.join(", "));
                }
                if !skipped_bands.is_empty() {
                    println!(
                        "    {} {}",
                        s.skipped.apply_to("already stored"),
                        skipped_bands.join(", ")
                    );
                }
            }
            IngestOutcome::Failed(failure) => {
                println!("    {} {failure}", s.failed.apply_to("failed"));
            }
        }
    }
    println!();

    if !report.removed_satellites.is_empty() {
        println!("  {}", s.header.apply_to("Removed satellites"));
        for sat in &report.removed_satellites {
            println!("    {:<8}{}", sat.norad, sat.name);
        }
        println!();
    }

    s.print_field("Files", report.files.len());
    s.print_field("Succeeded", report.succeeded());
    s.print_field("Failed", report.failed());
    s.print_field("Light curves", report.records_created());
    println!();
}

pub fn print_backfill_summary(summary: &BackfillSummary) {
    let s = Styles::new();
    s.print_title("Backfill");

    s.print_field("Processed", summary.processed);
    s.print_field("Periodic", summary.periodic);
    s.print_field("Manual", summary.kept_manual);
    s.print_field("Failed", summary.failures.len());
    s.print_field("Satellites", summary.satellites_refreshed);
    if summary.cancelled {
        println!("  {}", s.skipped.apply_to("cancelled before all light curves were processed"));
    }

    if !summary.failures.is_empty() {
        println!();
        println!("  {}", s.header.apply_to("Failures"));
        for record in &summary.failures {
            if let Err(reason) = &record.outcome {
                println!("    {:<8}{}", record.light_curve, s.failed.apply_to(reason));
            }
        }
    }
    println!();
}

/// One line per satellite with its light-curve count.
pub fn print_satellites(satellites: &[(Satellite, usize)]) {
    let s = Styles::new();
    if satellites.is_empty() {
        println!("{}", s.skipped.apply_to("Catalog is empty"));
        return;
    }

    println!(
        "{}",
        s.header.apply_to(format!(
            "{:<8} {:<12} {:<28} {:>6}  {}",
            "NORAD", "COSPAR", "Name", "Curves", "Updated"
        ))
    );
    for (sat, curves) in satellites {
        let updated = sat
            .updated
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<8} {:<12} {:<28} {:>6}  {}",
            sat.norad, sat.cospar, sat.name, curves, updated
        );
    }
}

pub fn print_light_curves(satellite: &Satellite, curves: &[LightCurve]) {
    let s = Styles::new();
    s.print_title(&format!("{} ({}, {})", satellite.name, satellite.norad, satellite.cospar));

    if curves.is_empty() {
        println!("  {}", s.skipped.apply_to("no light curves"));
        return;
    }
    println!(
        "  {}",
        s.header.apply_to(format!(
            "{:>6}  {:<19}  {:<4} {:>6} {:>7}  {}",
            "Id", "Start", "Band", "dt", "Samples", "Period"
        ))
    );
    for lc in curves {
        println!(
            "  {:>6}  {:<19}  {:<4} {:>6} {:>7}  {}",
            lc.id,
            lc.start_time.format("%Y-%m-%d %H:%M:%S"),
            lc.band,
            lc.sample_interval,
            lc.len(),
            lc.period_label()
        );
    }
    println!();
}
