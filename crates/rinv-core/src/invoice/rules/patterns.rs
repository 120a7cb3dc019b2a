//! Common regex patterns for receipt row extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Thousands-grouped integers with commas only: 12,000 or 1,234,567
    pub static ref GROUPED_NUMBER: Regex = Regex::new(
        r"\b[0-9]{1,3}(?:,[0-9]{3})+\b"
    ).unwrap();

    // Looser grouping for subtotal rows, where OCR often splits groups with spaces
    pub static ref SUBTOTAL_NUMBER: Regex = Regex::new(
        r"\b[0-9]{1,3}(?:[ ,\s]*[0-9]{3})+\b"
    ).unwrap();

    pub static ref BARE_NUMBER: Regex = Regex::new(
        r"\b[0-9]{4,}\b"
    ).unwrap();

    // JAN/EAN barcodes printed next to product names
    pub static ref BARCODE: Regex = Regex::new(
        r"\b[0-9]{13}\b"
    ).unwrap();

    pub static ref SPACED_COMMA: Regex = Regex::new(
        r"\s*,\s*"
    ).unwrap();

    pub static ref SPACE_BEFORE_CURRENCY: Regex = Regex::new(
        r"\s+([¥円])"
    ).unwrap();

    pub static ref NON_DIGIT: Regex = Regex::new(
        r"[^0-9]"
    ).unwrap();

    // Price columns left over at the end of a row
    pub static ref TRAILING_PRICE_COLUMNS: Regex = Regex::new(
        r"[0-9\s,¥円]+$"
    ).unwrap();

    // Japanese long date: 2024年3月5日, digits half- or full-width
    pub static ref DATE_JP: Regex = Regex::new(
        r"([0-9０-９]{4})\s*年\s*([0-9０-９]{1,2})\s*月\s*([0-9０-９]{1,2})\s*日"
    ).unwrap();

    // OCR misreads of product names
    pub static ref OCR_PHONE: Regex = Regex::new(r"(?i)\bPhone\b").unwrap();
    pub static ref OCR_SIM_FREE: Regex = Regex::new(r"(?i)M FREE").unwrap();
    pub static ref OCR_INSTAX: Regex = Regex::new(r"(?i)\bnstax\b").unwrap();
    pub static ref OCR_PLAYSTATION: Regex = Regex::new(r"(?i)PIayStation").unwrap();
    pub static ref OCR_SLIM: Regex = Regex::new(r"(?i)SIi\s*m|Sli\s*m").unwrap();
    pub static ref OCR_CFI: Regex = Regex::new(r"(?i)F\s*ト|CF\s*ト").unwrap();
    pub static ref OCR_NINTENDO: Regex = Regex::new(r"(?i)Ni\s*ntendo|Nintend0").unwrap();
}
