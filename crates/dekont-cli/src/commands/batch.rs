//! Batch command - check every receipt matching a glob pattern.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, error, warn};

use dekont_core::{CheckReport, Pipeline, StatusOutcome};

use super::check::{check_file, csv_row, CSV_HEADER};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for receipt PDFs (e.g. "receipts/*.pdf")
    #[arg(required = true)]
    input: String,

    /// Write one JSON report per receipt into this directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also write a summary CSV
    #[arg(long)]
    summary: bool,

    /// Keep going when a file cannot be read
    #[arg(long)]
    continue_on_error: bool,

    /// Enable OCR for image-only receipts
    #[arg(long)]
    ocr: bool,
}

/// One line of batch output when no output directory is given.
#[derive(Serialize)]
struct BatchEntry<'a> {
    file: String,
    #[serde(flatten)]
    report: &'a CheckReport,
}

struct BatchResult {
    path: PathBuf,
    report: CheckReport,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::config::load(config_path)?;
    if args.ocr {
        config.ocr.enabled = true;
    }

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to check",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let pipeline = Arc::new(Pipeline::from_config(&config)?);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let outcome = check_file(Arc::clone(&pipeline), path.clone(), &config).await;
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        let report = match outcome {
            Ok(report) => report,
            Err(e) if args.continue_on_error => {
                warn!("Failed to check {}: {}", path.display(), e);
                CheckReport::failed(e.to_string())
            }
            Err(e) => {
                error!("Failed to check {}: {}", path.display(), e);
                pb.abandon();
                anyhow::bail!("Checking {} failed: {}", path.display(), e);
            }
        };

        results.push(BatchResult {
            path,
            report,
            processing_time_ms,
        });
        pb.inc(1);
    }

    pb.finish_and_clear();

    match &args.output_dir {
        Some(output_dir) => {
            for result in &results {
                let output_path = output_dir.join(report_file_name(&result.path));
                fs::write(&output_path, serde_json::to_string_pretty(&result.report)?)?;
                debug!("Wrote {}", output_path.display());
            }
        }
        None => {
            for result in &results {
                let entry = BatchEntry {
                    file: result.path.display().to_string(),
                    report: &result.report,
                };
                println!("{}", serde_json::to_string(&entry)?);
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    print_totals(&results, start);

    Ok(())
}

fn report_file_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("receipt");
    format!("{}.json", stem)
}

fn write_summary(path: &Path, results: &[BatchResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header: Vec<&str> = CSV_HEADER.to_vec();
    header.push("processing_time_ms");
    wtr.write_record(&header)?;

    for result in results {
        let mut row = csv_row(&result.report, &result.path);
        row.push(result.processing_time_ms.to_string());
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

fn print_totals(results: &[BatchResult], start: Instant) {
    let identified = results
        .iter()
        .filter(|r| !r.report.detected.is_unknown())
        .count();
    let completed = results
        .iter()
        .filter(|r| r.report.data.tr_status == StatusOutcome::Completed)
        .count();
    let errors = results.iter().filter(|r| r.report.data.is_error()).count();

    eprintln!();
    eprintln!(
        "{} Checked {} files in {:.2?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!("  Identified: {}", style(identified).green());
    eprintln!("  Completed:  {}", style(completed).green());
    if errors > 0 {
        eprintln!("  With errors: {}", style(errors).red());
    }
}
