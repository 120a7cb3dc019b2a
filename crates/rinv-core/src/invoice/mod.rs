//! Line item extraction and invoice assembly.

mod extractor;
pub mod margin;
mod pipeline;
pub mod reconcile;
pub mod rules;

pub use extractor::{ExtractionResult, LineItemExtractor};
pub use margin::{MarginPolicy, NoMargin, TieredMargin, apply_margin, policy_from_config};
pub use pipeline::{InvoicePipeline, ProcessedDocument};
pub use reconcile::{QuantityCorrection, reconcile_quantities};

use crate::ocr::OcrDocument;

/// Trait for line item extractors.
pub trait InvoiceExtractor {
    /// Extract line items from an OCR document.
    fn extract(&self, document: &OcrDocument) -> ExtractionResult;

    /// Extract line items from plain text, one row per line.
    fn extract_from_text(&self, text: &str) -> ExtractionResult;
}
