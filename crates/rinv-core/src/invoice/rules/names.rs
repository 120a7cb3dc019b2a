//! Product name cleanup.

use regex::Regex;

use super::patterns::TRAILING_PRICE_COLUMNS;

/// Column headers that leak into a row when OCR merges the header line with
/// the first data line: item, unit price, subtotal, amount, quantity.
pub const DEFAULT_HEADER_TOKENS: [&str; 5] = ["品番・品名", "単価", "小計", "金額", "数量"];

/// Turns a normalized row into a product name.
#[derive(Debug, Clone)]
pub struct NameCleaner {
    header_prefix: Option<Regex>,
}

impl NameCleaner {
    pub fn new<I, S>(header_tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alternatives: Vec<String> = header_tokens
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .map(|t| regex::escape(&t))
            .collect();

        // Escaped literals always form a valid pattern.
        let header_prefix = (!alternatives.is_empty())
            .then(|| Regex::new(&format!("^(?:{})+", alternatives.join("|"))).ok())
            .flatten();

        Self { header_prefix }
    }

    /// Drop trailing price columns and leading header tokens.
    pub fn clean(&self, row: &str) -> String {
        let name = TRAILING_PRICE_COLUMNS.replace(row, "");
        let name = name.trim();

        match &self.header_prefix {
            Some(prefix) => prefix.replace(name, "").trim().to_string(),
            None => name.to_string(),
        }
    }
}

impl Default for NameCleaner {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_TOKENS)
    }
}
