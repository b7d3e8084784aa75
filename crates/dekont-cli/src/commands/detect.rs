//! Detect command - classification only.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use console::style;

use dekont_core::{Classification, Pipeline};

/// Arguments for the detect command.
#[derive(Args)]
pub struct DetectArgs {
    /// Receipt PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Enable OCR for image-only receipts
    #[arg(long)]
    ocr: bool,

    /// Print a one-line summary instead of JSON
    #[arg(long)]
    plain: bool,
}

pub async fn run(args: DetectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = super::config::load(config_path)?;
    if args.ocr {
        config.ocr.enabled = true;
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let timeout = Duration::from_secs(config.ocr.timeout_secs);
    let pipeline = Arc::new(Pipeline::from_config(&config)?);
    let path = args.input.clone();
    let detected = super::run_bounded(timeout, move || {
        let document = pipeline.open(&path)?;
        Ok(pipeline.detect(&document))
    })
    .await?
    .unwrap_or_else(Classification::unknown);

    if args.plain {
        let mark = if detected.is_unknown() {
            style("✗").red()
        } else {
            style("✓").green()
        };
        println!(
            "{} {} {} ({})",
            mark,
            args.input.display(),
            detected.key,
            detected.method
        );
    } else {
        println!("{}", serde_json::to_string_pretty(&detected)?);
    }

    Ok(())
}
