//! Recognized text as handed over by an external OCR engine.
//!
//! Nothing here runs OCR. These types describe the engine's output (word boxes
//! and the full text blob) and turn word boxes into text rows.

mod layout;

pub use layout::{DEFAULT_ROW_TOLERANCE, RowGrouper};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A detected text box with quadrilateral coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4) for quadrilateral.
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,
}

impl TextBox {
    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// A single recognized word anchored at the top-left of its bounding rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordToken {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
    /// Recognized text.
    pub text: String,
}

impl WordToken {
    pub fn new(x: f32, y: f32, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
        }
    }
}

impl From<&TextBox> for WordToken {
    fn from(text_box: &TextBox) -> Self {
        let (min_x, min_y, _, _) = text_box.rect();
        Self::new(min_x, min_y, text_box.text.clone())
    }
}

/// OCR output for one document.
///
/// Either `rows` (already grouped lines) or `words` (positioned tokens) may be
/// given. Rows win when both are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrDocument {
    /// Positioned word tokens.
    pub words: Vec<WordToken>,

    /// Pre-grouped text rows.
    pub rows: Vec<String>,

    /// Full recognized text.
    pub text: String,
}

impl OcrDocument {
    /// Build a document from plain text, one row per non-blank line.
    pub fn from_plain_text(text: &str) -> Self {
        Self {
            words: Vec::new(),
            rows: text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            text: text.to_string(),
        }
    }

    /// Load a document: `.txt` files hold one row per line, anything else is
    /// read as JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_text = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt"));

        if is_text {
            Ok(Self::from_plain_text(&content))
        } else {
            Ok(serde_json::from_str(&content)?)
        }
    }

    /// True when there are neither words nor rows to extract from.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.rows.is_empty()
    }

    /// Text rows for this document, grouping word tokens when needed.
    pub fn text_rows(&self, grouper: &RowGrouper) -> Vec<String> {
        if !self.rows.is_empty() {
            return self.rows.clone();
        }
        grouper.group(&self.words)
    }

    /// Full text blob, falling back to the joined rows.
    pub fn full_text(&self, rows: &[String]) -> String {
        if self.text.trim().is_empty() {
            rows.join("\n")
        } else {
            self.text.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_from_text_box_uses_top_left() {
        let text_box = TextBox {
            bbox: [12.0, 104.0, 80.0, 100.0, 82.0, 120.0, 10.0, 124.0],
            text: "iPhone".to_string(),
        };

        let word = WordToken::from(&text_box);
        assert_eq!(word, WordToken::new(10.0, 100.0, "iPhone"));
    }

    #[test]
    fn test_rows_take_precedence_over_words() {
        let doc = OcrDocument {
            words: vec![WordToken::new(0.0, 0.0, "ignored")],
            rows: vec!["Switch 32,978".to_string()],
            text: String::new(),
        };

        let rows = doc.text_rows(&RowGrouper::default());
        assert_eq!(rows, vec!["Switch 32,978".to_string()]);
        assert_eq!(doc.full_text(&rows), "Switch 32,978");
    }

    #[test]
    fn test_from_plain_text_skips_blank_lines() {
        let doc = OcrDocument::from_plain_text("領収書\n\n  iPhone 15 1 98,800  \n");
        assert_eq!(doc.rows, vec!["領収書", "iPhone 15 1 98,800"]);
    }

    #[test]
    fn test_deserialize_partial_document() {
        let doc: OcrDocument =
            serde_json::from_str(r#"{"words":[{"x":1.0,"y":2.0,"text":"a"}]}"#).unwrap();
        assert_eq!(doc.words.len(), 1);
        assert!(doc.rows.is_empty());
        assert!(doc.text.is_empty());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();

        let txt = dir.path().join("receipt.txt");
        std::fs::write(&txt, "Switch 32,978\n").unwrap();
        assert_eq!(OcrDocument::from_file(&txt).unwrap().rows, vec!["Switch 32,978"]);

        let json = dir.path().join("receipt.json");
        std::fs::write(&json, r#"{"rows":["PS5 66,980"]}"#).unwrap();
        let doc = OcrDocument::from_file(&json).unwrap();
        assert_eq!(doc.rows, vec!["PS5 66,980"]);
        assert!(!doc.is_empty());

        std::fs::write(&json, "not json").unwrap();
        assert!(OcrDocument::from_file(&json).is_err());
    }
}
