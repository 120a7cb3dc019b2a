//! Subtotal detection.
//!
//! A subtotal row carries the total glyph (`計`, as in 合計/小計) and is not a
//! consumption tax line (`消費`). The last figure on such a row is the
//! candidate; figures at or below the noise floor are ignored.

use crate::models::invoice::MAX_AMOUNT;

use super::normalize::to_half_width;
use super::patterns::{BARE_NUMBER, SUBTOTAL_NUMBER};
use super::{ExtractionMatch, FieldExtractor};

const TOTAL_GLYPH: &str = "計";
const TAX_GLYPH: &str = "消費";

/// Default noise floor for subtotal candidates.
pub const DEFAULT_SUBTOTAL_FLOOR: i64 = 1000;

/// Subtotal field extractor working on a single row.
pub struct SubtotalExtractor {
    floor: i64,
}

impl SubtotalExtractor {
    pub fn new() -> Self {
        Self {
            floor: DEFAULT_SUBTOTAL_FLOOR,
        }
    }

    /// Set the noise floor; candidates must exceed it.
    pub fn with_floor(mut self, floor: i64) -> Self {
        self.floor = floor;
        self
    }

    fn is_subtotal_row(row: &str) -> bool {
        row.contains(TOTAL_GLYPH) && !row.contains(TAX_GLYPH)
    }
}

impl Default for SubtotalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for SubtotalExtractor {
    type Output = ExtractionMatch<i64>;

    fn extract(&self, source: &str) -> Option<Self::Output> {
        if !Self::is_subtotal_row(source) {
            return None;
        }

        let row = to_half_width(source);
        let mut numbers: Vec<String> = SUBTOTAL_NUMBER
            .find_iter(&row)
            .map(|m| m.as_str().to_string())
            .collect();

        if numbers.is_empty() {
            let compact = row.replace([' ', ','], "");
            numbers = BARE_NUMBER
                .find_iter(&compact)
                .map(|m| m.as_str().to_string())
                .collect();
        }

        let last = numbers.pop()?;
        let digits: String = last.chars().filter(|c| c.is_ascii_digit()).collect();
        let value: i64 = digits.parse().ok()?;

        (value > self.floor && value <= MAX_AMOUNT)
            .then(|| ExtractionMatch::new(value, source))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        text.lines().filter_map(|row| self.extract(row)).collect()
    }
}

/// Detect the document subtotal; the last qualifying row wins.
pub fn detect_subtotal<S: AsRef<str>>(rows: &[S], floor: i64) -> Option<i64> {
    let extractor = SubtotalExtractor::new().with_floor(floor);
    rows.iter()
        .filter_map(|row| extractor.extract(row.as_ref()))
        .last()
        .map(|m| m.value)
}
