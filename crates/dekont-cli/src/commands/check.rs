//! Check command - classify one receipt and extract its fields.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use dekont_core::{CheckReport, DekontConfig, FieldRecord, OcrError, Pipeline};

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    /// Receipt PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Enable OCR for image-only receipts
    #[arg(long)]
    ocr: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
    Text,
}

pub async fn run(args: CheckArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = super::config::load(config_path)?;
    if args.ocr {
        config.ocr.enabled = true;
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.set_message(format!("Checking {}", args.input.display()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let pipeline = Arc::new(Pipeline::from_config(&config)?);
    let report = check_file(pipeline, args.input.clone(), &config).await;
    pb.finish_and_clear();
    let report = report?;

    let content = render(&report, &args.input, args.format)?;

    if let Some(output_path) = args.output {
        fs::write(&output_path, &content)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", content);
    }

    Ok(())
}

/// Check one file on the blocking pool, bounded by the OCR timeout.
///
/// A timeout yields an UNKNOWN report carrying the reason instead of an error.
pub(crate) async fn check_file(
    pipeline: Arc<Pipeline>,
    path: PathBuf,
    config: &DekontConfig,
) -> anyhow::Result<CheckReport> {
    let timeout = Duration::from_secs(config.ocr.timeout_secs);
    let task_path = path.clone();
    let outcome = super::run_bounded(timeout, move || {
        let document = pipeline.open(&task_path)?;
        Ok(pipeline.check(&document))
    })
    .await?;

    match outcome {
        Some(report) => {
            info!(
                "{}: {} in {}ms",
                path.display(),
                report.detected.key,
                report.processing_time_ms
            );
            Ok(report)
        }
        None => {
            warn!(
                "{}: gave up after {}s",
                path.display(),
                timeout.as_secs()
            );
            Ok(CheckReport::failed(
                OcrError::Timeout(timeout.as_secs()).to_string(),
            ))
        }
    }
}

pub(crate) fn render(
    report: &CheckReport,
    path: &Path,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => format_report_csv(report, path),
        OutputFormat::Text => Ok(format_report_text(report)),
    }
}

pub(crate) const CSV_HEADER: [&str; 16] = [
    "file",
    "key",
    "bank",
    "variant",
    "method",
    "tr_status",
    "sender_name",
    "sender_iban",
    "receiver_name",
    "receiver_iban",
    "amount",
    "transaction_time",
    "receipt_no",
    "transaction_ref",
    "fis_no",
    "error",
];

pub(crate) fn csv_row(report: &CheckReport, path: &Path) -> Vec<String> {
    let data = &report.data;
    let field = |value: &Option<String>| value.clone().unwrap_or_default();
    vec![
        path.display().to_string(),
        report.detected.key.clone(),
        report.detected.bank.clone(),
        field(&report.detected.variant),
        report.detected.method.to_string(),
        data.tr_status.to_string(),
        field(&data.sender_name),
        field(&data.sender_iban),
        field(&data.receiver_name),
        field(&data.receiver_iban),
        field(&data.amount),
        field(&data.transaction_time),
        field(&data.receipt_no),
        field(&data.transaction_ref),
        data.extra(FieldRecord::FIS_NO).unwrap_or_default().to_string(),
        field(&data.error),
    ]
}

fn format_report_csv(report: &CheckReport, path: &Path) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;
    wtr.write_record(csv_row(report, path))?;
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_report_text(report: &CheckReport) -> String {
    let detected = &report.detected;
    let data = &report.data;
    let mut output = String::new();

    output.push_str(&format!("{}\n", style("RECEIPT").bold()));
    output.push_str(&format!("{}\n\n", "=".repeat(50)));

    let variant = detected
        .variant
        .as_deref()
        .map(|v| format!(" {}", v))
        .unwrap_or_default();
    output.push_str(&format!(
        "Bank:        {}{} ({}, via {})\n",
        detected.bank, variant, detected.key, detected.method
    ));
    output.push_str(&format!("Status:      {}\n\n", data.tr_status));

    let rows = [
        ("Sender", &data.sender_name),
        ("Sender IBAN", &data.sender_iban),
        ("Receiver", &data.receiver_name),
        ("Recv. IBAN", &data.receiver_iban),
        ("Amount", &data.amount),
        ("Time", &data.transaction_time),
        ("Receipt no", &data.receipt_no),
        ("Reference", &data.transaction_ref),
    ];
    for (label, value) in rows {
        output.push_str(&format!(
            "{:<12} {}\n",
            format!("{}:", label),
            value.as_deref().unwrap_or("-")
        ));
    }
    for (name, value) in &data.extras {
        output.push_str(&format!("{:<12} {}\n", format!("{}:", name), value));
    }

    if let Some(error) = &data.error {
        output.push_str(&format!("\n{} {}\n", style("Error:").red(), error));
    }

    output
}
