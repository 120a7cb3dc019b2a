//! Corrections for known OCR misreads and price-column cleanup.
//!
//! The misread corrections run before any digit extraction: some of them
//! restore delimiters (`CFI-`) the price patterns depend on.

use std::borrow::Cow;

use super::patterns::{
    BARCODE, OCR_CFI, OCR_INSTAX, OCR_NINTENDO, OCR_PHONE, OCR_PLAYSTATION, OCR_SIM_FREE,
    OCR_SLIM, SPACED_COMMA, SPACE_BEFORE_CURRENCY,
};

/// Map full-width ASCII forms (`１２，０００`, `ｉＰｈｏｎｅ`) and the
/// full-width yen sign to their half-width counterparts.
pub fn to_half_width(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_full_width) {
        return Cow::Borrowed(text);
    }

    text.chars()
        .map(|c| match c {
            '\u{FF01}'..='\u{FF5E}' => {
                char::from_u32(c as u32 - 0xFF01 + 0x21).unwrap_or(c)
            }
            '\u{FFE5}' => '¥',
            _ => c,
        })
        .collect::<String>()
        .into()
}

fn is_full_width(c: char) -> bool {
    matches!(c, '\u{FF01}'..='\u{FF5E}' | '\u{FFE5}')
}

/// Apply the fixed, ordered list of misread corrections to a row.
pub fn correct_ocr_misreads(row: &str) -> String {
    let text = OCR_PHONE.replace_all(row, "iPhone");
    let text = fix_sim_free(&text);
    let text = OCR_INSTAX.replace_all(&text, "instax");
    let text = OCR_PLAYSTATION.replace_all(&text, "PlayStation");
    let text = OCR_SLIM.replace_all(&text, "Slim");
    let text = OCR_CFI.replace_all(&text, "CFI-");
    let text = OCR_NINTENDO.replace_all(&text, "Nintendo");
    text.replace("  ", " ")
}

/// "M FREE" not already preceded by "SI" becomes "SIM FREE".
fn fix_sim_free(text: &str) -> Cow<'_, str> {
    let mut out = String::new();
    let mut last = 0;

    for m in OCR_SIM_FREE.find_iter(text) {
        let before = &text.as_bytes()[..m.start()];
        if before.len() >= 2 && before[before.len() - 2..].eq_ignore_ascii_case(b"SI") {
            continue;
        }
        out.push_str(&text[last..m.start()]);
        out.push_str("SIM FREE");
        last = m.end();
    }

    if last == 0 && out.is_empty() {
        return Cow::Borrowed(text);
    }
    out.push_str(&text[last..]);
    Cow::Owned(out)
}

/// Strip what gets in the way of price parsing: barcodes and stray spaces
/// around commas and currency glyphs.
pub fn price_text(row: &str) -> String {
    let text = BARCODE.replace_all(row, "");
    let text = SPACED_COMMA.replace_all(&text, ",");
    SPACE_BEFORE_CURRENCY.replace_all(&text, "$1").into_owned()
}
