//! Manual command - invoice for a hand-entered line item.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use rinv_core::models::invoice::{InvoiceDraft, LineItem, TaxMode};

use super::{date_or_today, emit_invoice, load_config};

/// Series letter marking manually created invoices.
const MANUAL_SERIES: char = 'M';

/// Arguments for the manual command.
#[derive(Args)]
pub struct ManualArgs {
    /// Item description
    name: String,

    /// Unit price
    unit: i64,

    /// Quantity
    #[arg(default_value = "1")]
    qty: i64,

    /// Whether the unit price includes consumption tax
    #[arg(short, long, value_enum, default_value = "inclusive")]
    tax: TaxArg,

    /// Issue date (YYYY-MM-DD or YYYY/MM/DD, default: today)
    #[arg(short, long)]
    date: Option<String>,

    /// Invoice sequence number for the issue date
    #[arg(short, long, default_value = "1")]
    sequence: u32,

    /// Invoice recipient (default: from config)
    #[arg(long)]
    to: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum TaxArg {
    /// Price already includes tax
    Inclusive,
    /// 10% tax is added on top
    Exclusive,
}

impl From<TaxArg> for TaxMode {
    fn from(arg: TaxArg) -> Self {
        match arg {
            TaxArg::Inclusive => TaxMode::Inclusive,
            TaxArg::Exclusive => TaxMode::Exclusive,
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    invoice: &'a InvoiceDraft,
    tax: TaxMode,
}

pub async fn run(args: ManualArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if args.name.trim().is_empty() {
        anyhow::bail!("Item name must not be empty");
    }
    if args.unit <= 0 || args.qty <= 0 {
        anyhow::bail!("Unit price and quantity must be positive");
    }

    let tax = TaxMode::from(args.tax);
    let item = LineItem::manual(args.name.trim(), args.unit, args.qty, tax)?;
    let issue_date = date_or_today(args.date.as_deref())?;

    let draft = InvoiceDraft::build(
        vec![item],
        issue_date,
        config.invoice.payment_terms_days,
        args.sequence,
        Some(MANUAL_SERIES),
    )?
    .with_recipient(args.to.unwrap_or(config.invoice.recipient));

    let output = serde_json::to_string_pretty(&Report {
        invoice: &draft,
        tax,
    })?;

    emit_invoice(&draft, &output, args.output.as_deref())
}
