//! Core library for turning receipt OCR output into invoice line items.
//!
//! This crate provides:
//! - Row grouping for positioned OCR words
//! - Keyword-driven line item extraction with OCR misread correction
//! - Subtotal detection and quantity reconciliation
//! - Pluggable margin policies and invoice draft assembly
//!
//! Running OCR and rendering invoices are left to other tools.

pub mod error;
pub mod invoice;
pub mod models;
pub mod ocr;

pub use error::{ExtractionError, Result, RinvError};
pub use invoice::{
    ExtractionResult, InvoiceExtractor, InvoicePipeline, LineItemExtractor, MarginPolicy,
    NoMargin, ProcessedDocument, QuantityCorrection, TieredMargin,
};
pub use models::config::RinvConfig;
pub use models::invoice::{InvoiceDraft, LineItem, TaxMode, format_amount};
pub use ocr::{OcrDocument, RowGrouper, TextBox, WordToken};
