//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::RinvError;
use crate::invoice::rules::names::DEFAULT_HEADER_TOKENS;
use crate::invoice::rules::subtotal::DEFAULT_SUBTOTAL_FLOOR;
use crate::models::invoice::{
    DEFAULT_PAYMENT_TERMS_DAYS, DEFAULT_RECIPIENT, MAX_PAYMENT_TERMS_DAYS,
};
use crate::ocr::DEFAULT_ROW_TOLERANCE;

/// Product-name fragments that mark a row as a line item.
pub const DEFAULT_KEYWORDS: [&str; 24] = [
    "iphone",
    "apple",
    "sim",
    "未開封",
    "playstation",
    "piaystation",
    "station",
    "switch",
    "instax",
    "コントローラー",
    "チェキ",
    "phone",
    "stax",
    "ps5",
    "ディスク",
    "ワンピース",
    "一番くじ",
    "フィギュア",
    "カード",
    "box",
    "パック",
    "ポケモン",
    "デッキ",
    "スタート",
];

/// Main configuration for the rinv pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RinvConfig {
    /// Row grouping configuration.
    pub layout: LayoutConfig,

    /// Line item extraction configuration.
    pub extraction: ExtractionConfig,

    /// Margin deduction configuration.
    pub margin: MarginConfig,

    /// Invoice assembly configuration.
    pub invoice: InvoiceConfig,
}

/// Row grouping configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Maximum vertical distance from a row's first word.
    pub row_tolerance: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            row_tolerance: DEFAULT_ROW_TOLERANCE,
        }
    }
}

/// Line item extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Rows containing one of these (case-insensitive) are line items.
    pub keywords: Vec<String>,

    /// Column headers stripped from the front of item names.
    pub header_tokens: Vec<String>,

    /// Correct common OCR misreads in product names.
    pub auto_correct: bool,

    /// Adjust quantities so items add up to the printed subtotal.
    pub reconcile_subtotal: bool,

    /// Subtotal candidates must exceed this value.
    pub subtotal_floor: i64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            header_tokens: DEFAULT_HEADER_TOKENS.iter().map(|t| t.to_string()).collect(),
            auto_correct: true,
            reconcile_subtotal: true,
            subtotal_floor: DEFAULT_SUBTOTAL_FLOOR,
        }
    }
}

/// Margin deduction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginConfig {
    /// Deduct a margin from unit prices.
    pub enabled: bool,

    /// Unit prices at or above this get the large deduction.
    pub threshold: i64,

    /// Names containing this (case-insensitive) get the large deduction.
    pub brand_keyword: String,

    pub large_deduction: i64,

    pub small_deduction: i64,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 20000,
            brand_keyword: "iphone".to_string(),
            large_deduction: 100,
            small_deduction: 20,
        }
    }
}

/// Invoice assembly configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceConfig {
    /// Days from issue date to payment due date.
    pub payment_terms_days: i64,

    /// Company invoices are addressed to.
    pub recipient: String,
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        Self {
            payment_terms_days: DEFAULT_PAYMENT_TERMS_DAYS,
            recipient: DEFAULT_RECIPIENT.to_string(),
        }
    }
}

impl RinvConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, RinvError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        if let Err(e) = config.validate() {
            warn!("Rejected configuration {}: {}", path.display(), e);
            return Err(e);
        }
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), RinvError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the extractor cannot work with.
    pub fn validate(&self) -> Result<(), RinvError> {
        if !self
            .extraction
            .keywords
            .iter()
            .any(|k| !k.trim().is_empty())
        {
            return Err(RinvError::Config(
                "extraction.keywords must contain at least one keyword".to_string(),
            ));
        }
        if !(self.layout.row_tolerance >= 0.0) {
            return Err(RinvError::Config(
                "layout.row_tolerance must be non-negative".to_string(),
            ));
        }
        if !(0..=MAX_PAYMENT_TERMS_DAYS).contains(&self.invoice.payment_terms_days) {
            return Err(RinvError::Config(format!(
                "invoice.payment_terms_days must be between 0 and {}",
                MAX_PAYMENT_TERMS_DAYS
            )));
        }
        if self.invoice.recipient.trim().is_empty() {
            return Err(RinvError::Config(
                "invoice.recipient must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RinvConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.layout.row_tolerance, 15.0);
        assert_eq!(config.extraction.subtotal_floor, 1000);
        assert_eq!(config.invoice.payment_terms_days, 7);
        assert_eq!(config.invoice.recipient, "株式会社ミナミトランスポートレーション");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RinvConfig =
            serde_json::from_str(r#"{"margin": {"enabled": false}}"#).unwrap();
        assert!(!config.margin.enabled);
        assert_eq!(config.margin.threshold, 20000);
        assert!(config.extraction.keywords.contains(&"iphone".to_string()));
    }

    #[test]
    fn test_empty_keywords_rejected() {
        let mut config = RinvConfig::default();
        config.extraction.keywords = vec![" ".to_string()];
        assert!(matches!(config.validate(), Err(RinvError::Config(_))));
    }

    #[test]
    fn test_payment_terms_bounds() {
        let mut config = RinvConfig::default();
        config.invoice.payment_terms_days = 3650;
        assert!(config.validate().is_ok());

        for days in [-1, 3651, i64::MAX] {
            config.invoice.payment_terms_days = days;
            assert!(matches!(config.validate(), Err(RinvError::Config(_))));
        }
    }

    #[test]
    fn test_blank_recipient_rejected() {
        let mut config = RinvConfig::default();
        config.invoice.recipient = "  ".to_string();
        assert!(matches!(config.validate(), Err(RinvError::Config(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = RinvConfig::default();
        config.invoice.payment_terms_days = 14;
        config.save(&path).unwrap();

        let loaded = RinvConfig::from_file(&path).unwrap();
        assert_eq!(loaded.invoice.payment_terms_days, 14);
    }
}
