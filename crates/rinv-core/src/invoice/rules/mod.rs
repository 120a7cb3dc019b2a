//! Rule-based field extractors for receipt rows.

pub mod dates;
pub mod keywords;
pub mod names;
pub mod normalize;
pub mod patterns;
pub mod quantities;
pub mod subtotal;

pub use dates::{DateExtractor, extract_issue_date, parse_date};
pub use keywords::KeywordMatcher;
pub use names::NameCleaner;
pub use normalize::{correct_ocr_misreads, price_text, to_half_width};
pub use quantities::{Quantities, Tier, parse_quantities};
pub use subtotal::{SubtotalExtractor, detect_subtotal};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value together with the text it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
