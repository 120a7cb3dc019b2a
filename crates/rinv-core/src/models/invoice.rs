//! Invoice data models handed to the document renderer.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// Largest amount read from a receipt. Larger figures are OCR noise.
pub const MAX_AMOUNT: i64 = 100_000_000_000;

/// A single line item on the invoice. Amounts are whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product name.
    pub name: String,

    /// Unit price.
    pub unit: i64,

    /// Quantity.
    pub qty: i64,

    /// Line total.
    pub total: i64,
}

/// How a manually entered unit price relates to consumption tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxMode {
    /// The price already includes tax.
    Inclusive,
    /// 10% consumption tax is added on top.
    Exclusive,
}

impl LineItem {
    /// Create an item whose total is `unit * qty`, saturating at the `i64`
    /// bounds.
    pub fn new(name: impl Into<String>, unit: i64, qty: i64) -> Self {
        Self {
            name: name.into(),
            unit,
            qty,
            total: unit.saturating_mul(qty),
        }
    }

    /// Create a hand-entered item. Tax-exclusive totals are rounded down.
    pub fn manual(
        name: impl Into<String>,
        unit: i64,
        qty: i64,
        tax: TaxMode,
    ) -> Result<Self, ExtractionError> {
        let total = unit.checked_mul(qty).and_then(|gross| match tax {
            TaxMode::Inclusive => Some(gross),
            TaxMode::Exclusive => gross.checked_mul(11).map(|t| t.div_euclid(10)),
        });
        let total = total.ok_or_else(|| ExtractionError::Parse {
            field: "total".to_string(),
            value: format!("{} x {}", unit, qty),
        })?;

        Ok(Self {
            name: name.into(),
            unit,
            qty,
            total,
        })
    }

    /// A pick request for `qty` items at the fixed per-item fee.
    pub fn pick(qty: i64) -> Result<Self, ExtractionError> {
        Self::manual(PICK_ITEM, PICK_UNIT_PRICE, qty, TaxMode::Inclusive)
    }

    /// Change the quantity and recompute the total.
    pub fn set_qty(&mut self, qty: i64) {
        self.qty = qty;
        self.total = self.unit.saturating_mul(qty);
    }

    /// Change the unit price and recompute the total.
    pub fn set_unit(&mut self, unit: i64) {
        self.unit = unit;
        self.total = unit.saturating_mul(self.qty);
    }

    /// Whether `total == unit * qty`.
    pub fn is_consistent(&self) -> bool {
        self.unit.checked_mul(self.qty) == Some(self.total)
    }
}

/// Sum of item totals, `None` on overflow.
pub fn checked_total(items: &[LineItem]) -> Option<i64> {
    items
        .iter()
        .try_fold(0i64, |sum, item| sum.checked_add(item.total))
}

/// Default number of days between issue and payment due date.
pub const DEFAULT_PAYMENT_TERMS_DAYS: i64 = 7;

/// Longest accepted payment term, in days.
pub const MAX_PAYMENT_TERMS_DAYS: i64 = 3650;

/// Company invoices are addressed to unless configured otherwise.
pub const DEFAULT_RECIPIENT: &str = "株式会社ミナミトランスポートレーション";

/// Item name and unit price of a pick request.
pub const PICK_ITEM: &str = "ピック依頼";
pub const PICK_UNIT_PRICE: i64 = 200;

/// An invoice ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDraft {
    /// Invoice number, `YYYYMMDD-NN` (optionally with a series letter).
    pub invoice_number: String,

    /// Date the invoice was issued.
    pub issue_date: NaiveDate,

    /// Payment due date.
    pub due_date: NaiveDate,

    /// Company the invoice is addressed to.
    #[serde(default)]
    pub recipient: String,

    /// Line items in receipt order.
    pub items: Vec<LineItem>,

    /// Sum of item totals.
    pub total: i64,
}

impl InvoiceDraft {
    /// Assemble a draft; an empty item list is an error so callers skip the
    /// document instead of issuing an empty invoice.
    pub fn build(
        items: Vec<LineItem>,
        issue_date: NaiveDate,
        payment_terms_days: i64,
        sequence: u32,
        series: Option<char>,
    ) -> Result<Self, ExtractionError> {
        if items.is_empty() {
            return Err(ExtractionError::NoItems);
        }

        let total = checked_total(&items).ok_or_else(|| ExtractionError::Parse {
            field: "total".to_string(),
            value: format!("sum of {} items", items.len()),
        })?;

        let due_date = u64::try_from(payment_terms_days)
            .ok()
            .and_then(|days| issue_date.checked_add_days(Days::new(days)))
            .ok_or_else(|| ExtractionError::Parse {
                field: "payment_terms_days".to_string(),
                value: payment_terms_days.to_string(),
            })?;

        Ok(Self {
            invoice_number: invoice_number(issue_date, sequence, series),
            issue_date,
            due_date,
            recipient: String::new(),
            items,
            total,
        })
    }

    /// Address the invoice to `recipient`.
    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = recipient.into();
        self
    }

    /// Validate the draft and return a list of issues.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.items.is_empty() {
            issues.push("Invoice has no line items".to_string());
        }

        if self.recipient.trim().is_empty() {
            issues.push("Invoice has no recipient".to_string());
        }

        for (idx, item) in self.items.iter().enumerate() {
            if item.name.trim().is_empty() {
                issues.push(format!("Line item {} has an empty name", idx + 1));
            }
            if item.unit <= 0 {
                issues.push(format!("Line item {} has a non-positive unit price", idx + 1));
            }
            if item.qty <= 0 {
                issues.push(format!("Line item {} has a non-positive quantity", idx + 1));
            }
        }

        match checked_total(&self.items) {
            Some(sum) if sum != self.total => issues.push(format!(
                "Total mismatch: items sum to {}, invoice says {}",
                sum, self.total
            )),
            Some(_) => {}
            None => issues.push("Item totals overflow".to_string()),
        }

        if self.due_date < self.issue_date {
            issues.push("Due date is before issue date".to_string());
        }

        issues
    }
}

/// `YYYYMMDD-NN`, or `YYYYMMDD-XNN` with a series letter.
pub fn invoice_number(issue_date: NaiveDate, sequence: u32, series: Option<char>) -> String {
    let date = issue_date.format("%Y%m%d");
    match series {
        Some(letter) => format!("{}-{}{:02}", date, letter, sequence),
        None => format!("{}-{:02}", date, sequence),
    }
}

/// Format an amount with thousands separators, e.g. `98,800`.
pub fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut formatted = String::new();

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(c);
    }

    if amount < 0 {
        format!("-{}", formatted)
    } else {
        formatted
    }
}
