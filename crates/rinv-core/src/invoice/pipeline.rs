//! End-to-end processing of one OCR document into an invoice draft.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::error::{ExtractionError, Result};
use crate::models::config::RinvConfig;
use crate::models::invoice::InvoiceDraft;
use crate::ocr::{OcrDocument, RowGrouper};

use super::extractor::{ExtractionResult, LineItemExtractor};
use super::margin::{MarginPolicy, apply_margin, policy_from_config};
use super::rules::extract_issue_date;

/// Extraction result together with the draft built from it.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    /// Items as read from the document, before margin adjustment.
    pub extraction: ExtractionResult,
    /// Invoice with margin applied.
    pub draft: InvoiceDraft,
    /// Whether the issue date was read from the document.
    pub date_detected: bool,
}

/// Row grouping, extraction, margin and draft assembly in one place.
pub struct InvoicePipeline {
    grouper: RowGrouper,
    extractor: LineItemExtractor,
    margin: Box<dyn MarginPolicy>,
    payment_terms_days: i64,
    recipient: String,
    series: Option<char>,
}

impl InvoicePipeline {
    /// Create a pipeline from configuration.
    pub fn new(config: &RinvConfig) -> Self {
        let grouper = RowGrouper::new().with_tolerance(config.layout.row_tolerance);
        Self {
            extractor: LineItemExtractor::new(&config.extraction).with_grouper(grouper.clone()),
            grouper,
            margin: policy_from_config(&config.margin),
            payment_terms_days: config.invoice.payment_terms_days,
            recipient: config.invoice.recipient.clone(),
            series: None,
        }
    }

    /// Replace the margin policy.
    pub fn with_margin<P: MarginPolicy + 'static>(mut self, policy: P) -> Self {
        self.margin = Box::new(policy);
        self
    }

    /// Address invoices to `recipient` instead of the configured one.
    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = recipient.into();
        self
    }

    /// Set the invoice number series letter.
    pub fn with_series(mut self, series: char) -> Self {
        self.series = Some(series);
        self
    }

    /// Process one document.
    ///
    /// `fallback_date` is used when no date is printed on the document and
    /// `sequence` numbers the invoice within its issue date.
    pub fn process(
        &self,
        document: &OcrDocument,
        fallback_date: NaiveDate,
        sequence: u32,
    ) -> Result<ProcessedDocument> {
        self.process_with(document, fallback_date, |_| sequence)
    }

    /// Process one document, choosing the sequence number once the issue
    /// date is known.
    pub fn process_with<F>(
        &self,
        document: &OcrDocument,
        fallback_date: NaiveDate,
        sequence_for: F,
    ) -> Result<ProcessedDocument>
    where
        F: FnOnce(NaiveDate) -> u32,
    {
        if document.is_empty() {
            return Err(ExtractionError::MissingField("words or rows".to_string()).into());
        }

        let rows = document.text_rows(&self.grouper);
        debug!("Document has {} rows", rows.len());

        let extraction = self.extractor.extract_rows(&rows);
        for warning in &extraction.warnings {
            debug!("{}", warning);
        }

        let detected = extract_issue_date(&document.full_text(&rows));
        if detected.is_none() {
            warn!("No issue date found, using {}", fallback_date);
        }
        let issue_date = detected.unwrap_or(fallback_date);

        let mut items = extraction.items.clone();
        apply_margin(&mut items, self.margin.as_ref());

        let draft = InvoiceDraft::build(
            items,
            issue_date,
            self.payment_terms_days,
            sequence_for(issue_date),
            self.series,
        )?
        .with_recipient(self.recipient.clone());

        info!(
            "Invoice {}: {} items, total {}",
            draft.invoice_number,
            draft.items.len(),
            draft.total
        );

        Ok(ProcessedDocument {
            extraction,
            draft,
            date_detected: detected.is_some(),
        })
    }
}

impl Default for InvoicePipeline {
    fn default() -> Self {
        Self::new(&RinvConfig::default())
    }
}
