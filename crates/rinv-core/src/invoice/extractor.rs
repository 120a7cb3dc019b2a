//! Line item extraction from grouped OCR rows.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::invoice::{LineItem, checked_total};
use crate::ocr::{OcrDocument, RowGrouper};

use super::InvoiceExtractor;
use super::reconcile::{QuantityCorrection, reconcile_quantities};
use super::rules::{
    KeywordMatcher, NameCleaner, correct_ocr_misreads, detect_subtotal, parse_quantities,
    price_text, to_half_width,
};

/// Result of line item extraction for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted items in row order.
    pub items: Vec<LineItem>,
    /// Subtotal printed on the document, if one was found.
    pub subtotal: Option<i64>,
    /// Number of rows looked at.
    pub rows_scanned: usize,
    /// Rows that matched a product keyword.
    pub rows_matched: usize,
    /// Quantity changes made to reach the subtotal.
    pub corrections: Vec<QuantityCorrection>,
    /// Non-fatal extraction notes.
    pub warnings: Vec<String>,
}

impl ExtractionResult {
    /// Sum of item totals, saturating at `i64::MAX`.
    pub fn items_total(&self) -> i64 {
        checked_total(&self.items).unwrap_or(i64::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Keyword-driven line item extractor.
pub struct LineItemExtractor {
    keywords: KeywordMatcher,
    names: NameCleaner,
    grouper: RowGrouper,
    auto_correct: bool,
    reconcile: bool,
    subtotal_floor: i64,
}

impl LineItemExtractor {
    /// Create an extractor from configuration.
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            keywords: KeywordMatcher::new(&config.keywords),
            names: NameCleaner::new(&config.header_tokens),
            grouper: RowGrouper::new(),
            auto_correct: config.auto_correct,
            reconcile: config.reconcile_subtotal,
            subtotal_floor: config.subtotal_floor,
        }
    }

    /// Set the row grouper used for word-level input.
    pub fn with_grouper(mut self, grouper: RowGrouper) -> Self {
        self.grouper = grouper;
        self
    }

    /// Set subtotal reconciliation.
    pub fn with_reconciliation(mut self, reconcile: bool) -> Self {
        self.reconcile = reconcile;
        self
    }

    /// Set OCR misread correction.
    pub fn with_auto_correct(mut self, auto_correct: bool) -> Self {
        self.auto_correct = auto_correct;
        self
    }

    /// Extract line items from text rows.
    pub fn extract_rows<S: AsRef<str>>(&self, rows: &[S]) -> ExtractionResult {
        let subtotal = detect_subtotal(rows, self.subtotal_floor);
        let mut items = Vec::new();
        let mut rows_matched = 0;
        let mut warnings = Vec::new();

        for row in rows {
            let row = to_half_width(row.as_ref());
            if !self.keywords.matches(&row) {
                continue;
            }
            rows_matched += 1;

            match self.parse_row(&row) {
                Some(item) => items.push(item),
                None => {
                    debug!("No price decomposition for row: {}", row);
                    warnings.push(format!("Skipped row without prices: {}", row));
                }
            }
        }

        let corrections = match subtotal {
            Some(target) if self.reconcile => reconcile_quantities(&mut items, target),
            _ => Vec::new(),
        };

        info!(
            "Extracted {} items from {} rows ({} matched), subtotal {:?}",
            items.len(),
            rows.len(),
            rows_matched,
            subtotal
        );

        ExtractionResult {
            items,
            subtotal,
            rows_scanned: rows.len(),
            rows_matched,
            corrections,
            warnings,
        }
    }

    /// Turn one keyword-matched row into an item.
    fn parse_row(&self, row: &str) -> Option<LineItem> {
        let normalized = if self.auto_correct {
            correct_ocr_misreads(row)
        } else {
            row.to_string()
        };

        let quantities = parse_quantities(&price_text(&normalized))?;
        if quantities.unit == 0 {
            return None;
        }

        let name = self.names.clean(&normalized);
        debug!(
            "{:?}: {} -> {} x {}",
            quantities.tier, name, quantities.unit, quantities.qty
        );

        Some(LineItem::new(name, quantities.unit, quantities.qty))
    }
}

impl Default for LineItemExtractor {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

impl InvoiceExtractor for LineItemExtractor {
    fn extract(&self, document: &OcrDocument) -> ExtractionResult {
        let rows = document.text_rows(&self.grouper);
        self.extract_rows(&rows)
    }

    fn extract_from_text(&self, text: &str) -> ExtractionResult {
        self.extract(&OcrDocument::from_plain_text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::WordToken;
    use pretty_assertions::assert_eq;

    fn extractor() -> LineItemExtractor {
        LineItemExtractor::default()
    }

    #[test]
    fn test_two_number_row() {
        let result = extractor().extract_rows(&["Nintendo Switch 12,000 3 36,000"]);
        assert_eq!(result.items, vec![LineItem::new("Nintendo Switch", 12000, 3)]);
        assert_eq!(result.rows_matched, 1);
    }

    #[test]
    fn test_single_number_row() {
        let result = extractor().extract_rows(&["ポケモンカード BOX 12,345"]);
        assert_eq!(result.items, vec![LineItem::new("ポケモンカード BOX", 12345, 1)]);
    }

    #[test]
    fn test_unmatched_and_unparseable_rows_are_skipped() {
        let rows = ["領収書", "Switch 21000", "ありがとうございました"];
        let result = extractor().extract_rows(&rows);

        assert!(result.is_empty());
        assert_eq!(result.rows_scanned, 3);
        assert_eq!(result.rows_matched, 1);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_misreads_are_corrected_before_parsing() {
        let result = extractor().extract_rows(&["Phone 15 M FREE 1 98 , 800 ¥"]);
        // 15 and 1 are digits too: the lone grouped number still wins.
        assert_eq!(result.items, vec![LineItem::new("iPhone 15 SIM FREE", 98800, 1)]);
    }

    #[test]
    fn test_auto_correct_can_be_disabled() {
        let result = extractor()
            .with_auto_correct(false)
            .extract_rows(&["Phone 15 M FREE 1 98 , 800 ¥"]);
        assert_eq!(result.items, vec![LineItem::new("Phone 15 M FREE", 98800, 1)]);
    }

    #[test]
    fn test_barcode_is_ignored() {
        let result =
            extractor().extract_rows(&["Nintendo Switch 4902370550733 32,978 2 65,956"]);
        assert_eq!(result.items, vec![LineItem::new("Nintendo Switch", 32978, 2)]);
    }

    #[test]
    fn test_reconciliation_against_subtotal() {
        let rows = ["instax mini 12 13,500 1 13,500", "小計 ¥ 27,000"];
        let result = extractor().extract_rows(&rows);

        assert_eq!(result.subtotal, Some(27000));
        // Trailing model digits go with the price columns.
        assert_eq!(result.items, vec![LineItem::new("instax mini", 13500, 2)]);
        assert_eq!(result.corrections.len(), 1);
    }

    #[test]
    fn test_reconciliation_can_be_disabled() {
        let rows = ["instax mini 12 13,500 1 13,500", "小計 ¥ 27,000"];
        let result = extractor().with_reconciliation(false).extract_rows(&rows);

        assert_eq!(result.items[0].qty, 1);
        assert!(result.corrections.is_empty());
    }

    #[test]
    fn test_totals_are_consistent() {
        let rows = [
            "iPhone 15 128GB 1 124,800 124,800",
            "SIM 2 4980 9960",
            "PlayStation5 Slim 66,980",
            "合計 ¥ 206,740",
        ];
        let result = extractor().extract_rows(&rows);

        assert_eq!(result.items.len(), 3);
        assert!(result.items.iter().all(LineItem::is_consistent));
    }

    #[test]
    fn test_idempotent() {
        let rows = ["Switch 32,978 2 65,956", "合計 ¥ 98,934"];
        let first = extractor().extract_rows(&rows);
        let second = extractor().extract_rows(&rows);
        assert_eq!(first, second);
    }

    #[test]
    fn test_extract_from_words() {
        let document = OcrDocument {
            words: vec![
                WordToken::new(300.0, 101.0, "36,000"),
                WordToken::new(10.0, 100.0, "Switch"),
                WordToken::new(200.0, 102.0, "3"),
                WordToken::new(100.0, 100.0, "12,000"),
                WordToken::new(10.0, 140.0, "合計"),
                WordToken::new(300.0, 141.0, "¥36,000"),
            ],
            ..OcrDocument::default()
        };

        let result = extractor().extract(&document);
        assert_eq!(result.items, vec![LineItem::new("Switch", 12000, 3)]);
        assert_eq!(result.subtotal, Some(36000));
        assert!(result.corrections.is_empty());
    }

    #[test]
    fn test_full_width_digits() {
        let rows = ["iPhone 15 １２,０００ ３ ３６,０００", "合計 ￥３６，０００"];
        let result = extractor().extract_rows(&rows);

        assert_eq!(result.items, vec![LineItem::new("iPhone", 12000, 3)]);
        assert_eq!(result.subtotal, Some(36000));
        assert!(result.corrections.is_empty());
    }

    #[test]
    fn test_zero_unit_price_is_skipped_with_warning() {
        let result = extractor().extract_rows(&["iphone 0,000"]);

        assert!(result.items.is_empty());
        assert_eq!(result.rows_matched, 1);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_figures_beyond_amount_limit_are_not_items() {
        let row = "iphone 5,000,000,000,000,000,000 5,000,000,000,000,000,000";
        let result = extractor().extract_rows(&[row, row]);

        assert!(result.items.is_empty());
        assert_eq!(result.warnings.len(), 2);
        assert_eq!(result.items_total(), 0);
    }

    #[test]
    fn test_items_total_saturates() {
        let result = ExtractionResult {
            items: vec![LineItem::new("a", i64::MAX, 1), LineItem::new("b", 1, 1)],
            subtotal: None,
            rows_scanned: 2,
            rows_matched: 2,
            corrections: Vec::new(),
            warnings: Vec::new(),
        };
        assert_eq!(result.items_total(), i64::MAX);
    }

    #[test]
    fn test_extract_from_text() {
        let result = extractor().extract_from_text("レシート\nSwitch 32,978\n");
        assert_eq!(result.items_total(), 32978);
    }
}
