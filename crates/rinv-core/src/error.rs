//! Error types for the rinv-core library.

use thiserror::Error;

/// Main error type for the rinv library.
#[derive(Error, Debug)]
pub enum RinvError {
    /// Line item extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON input or configuration.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to line item extraction and invoice assembly.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Nothing on the document could be turned into a line item.
    #[error("no line items found")]
    NoItems,

    /// Required field is missing.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Failed to parse a value.
    #[error("failed to parse {field}: {value}")]
    Parse { field: String, value: String },
}

/// Result type for the rinv library.
pub type Result<T> = std::result::Result<T, RinvError>;
