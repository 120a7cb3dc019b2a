//! Batch processing command for multiple OCR documents.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, info, warn};

use rinv_core::invoice::{InvoicePipeline, NoMargin, ProcessedDocument};
use rinv_core::models::invoice::format_amount;
use rinv_core::{ExtractionError, OcrDocument, RinvError};

use super::extract::{OutputFormat, format_document};
use super::{date_or_today, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Issue date to use when none is printed (YYYY-MM-DD, default: today)
    #[arg(short, long)]
    date: Option<String>,

    /// Keep unit prices as printed
    #[arg(long)]
    no_margin: bool,

    /// Invoice recipient (default: from config)
    #[arg(long)]
    to: Option<String>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Outcome of processing a single file.
enum FileOutcome {
    Written(PathBuf, i64),
    NoItems,
    Failed(String),
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "json" | "txt")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    fs::create_dir_all(&args.output_dir)?;

    let fallback_date = date_or_today(args.date.as_deref())?;
    let mut pipeline = InvoicePipeline::new(&config);
    if args.no_margin {
        pipeline = pipeline.with_margin(NoMargin);
    }
    if let Some(recipient) = &args.to {
        pipeline = pipeline.with_recipient(recipient.as_str());
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());
    // Invoices issued so far, per issue date.
    let mut issued: HashMap<NaiveDate, u32> = HashMap::new();

    for path in files {
        let outcome = match process_file(&path, &pipeline, fallback_date, &issued) {
            Ok(processed) => {
                let total = processed.draft.total;
                let output_path = write_output(&path, &processed, &args)?;
                *issued.entry(processed.draft.issue_date).or_insert(0) += 1;
                FileOutcome::Written(output_path, total)
            }
            Err(RinvError::Extraction(ExtractionError::NoItems)) => {
                info!("No line items in {}, skipping", path.display());
                FileOutcome::NoItems
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    FileOutcome::Failed(error_msg)
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    pb.abandon();
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        };

        results.push((path, outcome));
        pb.inc(1);
    }

    pb.finish_and_clear();

    let mut written = 0;
    let mut skipped = 0;
    let mut failed = Vec::new();
    let mut grand_total: i64 = 0;

    for (path, outcome) in &results {
        match outcome {
            FileOutcome::Written(output_path, total) => {
                written += 1;
                grand_total = grand_total.saturating_add(*total);
                debug!("{} -> {}", path.display(), output_path.display());
            }
            FileOutcome::NoItems => skipped += 1,
            FileOutcome::Failed(msg) => failed.push((path, msg)),
        }
    }

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} written, {} without items, {} failed",
        style(written).green(),
        style(skipped).yellow(),
        style(failed.len()).red()
    );
    eprintln!("   Total invoiced: ¥{}", format_amount(grand_total));

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for (path, msg) in &failed {
            eprintln!("  - {}: {}", path.display(), msg);
        }
    }

    Ok(())
}

fn process_file(
    path: &Path,
    pipeline: &InvoicePipeline,
    fallback_date: NaiveDate,
    issued: &HashMap<NaiveDate, u32>,
) -> Result<ProcessedDocument, RinvError> {
    let document = OcrDocument::from_file(path)?;
    pipeline.process_with(&document, fallback_date, |issue_date| {
        issued.get(&issue_date).copied().unwrap_or(0) + 1
    })
}

fn write_output(
    input: &Path,
    processed: &ProcessedDocument,
    args: &BatchArgs,
) -> anyhow::Result<PathBuf> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("invoice");

    let output_path = args
        .output_dir
        .join(format!("{}.{}", stem, args.format.extension()));

    fs::write(&output_path, format_document(processed, args.format)?)?;
    debug!("Wrote output to {}", output_path.display());

    Ok(output_path)
}
