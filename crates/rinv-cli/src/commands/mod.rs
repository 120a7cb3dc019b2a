//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod extract;
pub mod manual;
pub mod pick;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use console::style;
use tracing::debug;

use rinv_core::RinvConfig;
use rinv_core::invoice::rules::parse_date;
use rinv_core::models::invoice::{InvoiceDraft, format_amount};

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rinv")
        .join("config.json")
}

/// Load the configuration from `--config`, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<RinvConfig> {
    match config_path {
        Some(path) => Ok(RinvConfig::from_file(Path::new(path))?),
        None => {
            let path = default_config_path();
            if path.exists() {
                debug!("Using config file {}", path.display());
                Ok(RinvConfig::from_file(&path)?)
            } else {
                Ok(RinvConfig::default())
            }
        }
    }
}

/// Date given on the command line, or today.
pub fn date_or_today(date: Option<&str>) -> anyhow::Result<NaiveDate> {
    match date {
        Some(value) => Ok(parse_date(value)?),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Print a rendered invoice, or write it to `output` and say so on stderr.
pub fn emit_invoice(
    draft: &InvoiceDraft,
    rendered: &str,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    match output {
        Some(output_path) => {
            fs::write(output_path, rendered)?;
            eprintln!(
                "{} Invoice {} (¥{}) written to {}",
                style("✓").green(),
                draft.invoice_number,
                format_amount(draft.total),
                output_path.display()
            );
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
