//! Pick command - invoice for pick requests handled on one day.

use std::path::PathBuf;

use clap::Args;

use rinv_core::models::invoice::{InvoiceDraft, LineItem};

use super::{date_or_today, emit_invoice, load_config};

/// Series letter marking pick request invoices.
const PICK_SERIES: char = 'P';

/// Arguments for the pick command.
#[derive(Args)]
pub struct PickArgs {
    /// Number of items picked
    qty: i64,

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

pub async fn run(args: PickArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if args.qty <= 0 {
        anyhow::bail!("Pick quantity must be positive");
    }

    let item = LineItem::pick(args.qty)?;
    let issue_date = date_or_today(args.date.as_deref())?;

    let draft = InvoiceDraft::build(
        vec![item],
        issue_date,
        config.invoice.payment_terms_days,
        args.sequence,
        Some(PICK_SERIES),
    )?
    .with_recipient(args.to.unwrap_or(config.invoice.recipient));

    let output = serde_json::to_string_pretty(&draft)?;
    emit_invoice(&draft, &output, args.output.as_deref())
}
