//! Extract command - build an invoice draft from a single OCR document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::{debug, info};

use rinv_core::invoice::{InvoicePipeline, NoMargin, ProcessedDocument, QuantityCorrection};
use rinv_core::models::invoice::{InvoiceDraft, format_amount};
use rinv_core::{ExtractionError, OcrDocument, RinvError};

use super::{date_or_today, load_config};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (OCR JSON or plain text rows)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Issue date to use when none is printed (YYYY-MM-DD, default: today)
    #[arg(short, long)]
    date: Option<String>,

    /// Invoice sequence number for the issue date
    #[arg(short, long, default_value = "1")]
    sequence: u32,

    /// Keep unit prices as printed
    #[arg(long)]
    no_margin: bool,

    /// Invoice recipient (default: from config)
    #[arg(long)]
    to: Option<String>,

    /// Validate the invoice draft
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "txt",
        }
    }
}

/// JSON shape of a processed document.
#[derive(Serialize)]
struct Report<'a> {
    invoice: &'a InvoiceDraft,
    subtotal: Option<i64>,
    corrections: &'a [QuantityCorrection],
    warnings: &'a [String],
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let document = OcrDocument::from_file(&args.input)?;
    let fallback_date = date_or_today(args.date.as_deref())?;

    let mut pipeline = InvoicePipeline::new(&config);
    if args.no_margin {
        pipeline = pipeline.with_margin(NoMargin);
    }
    if let Some(recipient) = &args.to {
        pipeline = pipeline.with_recipient(recipient.as_str());
    }

    let processed = match pipeline.process(&document, fallback_date, args.sequence) {
        Ok(processed) => processed,
        Err(RinvError::Extraction(ExtractionError::NoItems)) => {
            anyhow::bail!("No line items found in {}", args.input.display())
        }
        Err(e) => return Err(e.into()),
    };

    if args.validate {
        let issues = processed.draft.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let output = format_document(&processed, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render a processed document in the requested format.
pub fn format_document(processed: &ProcessedDocument, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let report = Report {
                invoice: &processed.draft,
                subtotal: processed.extraction.subtotal,
                corrections: &processed.extraction.corrections,
                warnings: &processed.extraction.warnings,
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
        OutputFormat::Text => Ok(format_text(processed)),
    }
}

fn format_text(processed: &ProcessedDocument) -> String {
    let draft = &processed.draft;
    let mut output = String::new();

    output.push_str(&format!("Invoice: {}\n", draft.invoice_number));
    output.push_str(&format!("To: {}\n", draft.recipient));
    output.push_str(&format!("Date: {}\n", draft.issue_date));
    output.push_str(&format!("Payment due: {}\n", draft.due_date));
    output.push('\n');

    output.push_str("Items:\n");
    for item in &draft.items {
        output.push_str(&format!(
            "  {:<40} {:>10} x {:>3} = {:>12}\n",
            item.name,
            format_amount(item.unit),
            item.qty,
            format_amount(item.total)
        ));
    }
    output.push('\n');

    output.push_str(&format!("Total: ¥{}\n", format_amount(draft.total)));

    if let Some(subtotal) = processed.extraction.subtotal {
        output.push_str(&format!("Printed subtotal: ¥{}\n", format_amount(subtotal)));
    }

    for correction in &processed.extraction.corrections {
        output.push_str(&format!(
            "Corrected {} qty {} -> {}\n",
            correction.name, correction.from_qty, correction.to_qty
        ));
    }

    output
}
