//! Row grouping for positioned OCR words.
//!
//! Words are clustered into horizontal bands with a greedy single pass over
//! the vertically sorted tokens. A band is anchored at the vertical position
//! of its first word; a word more than `tolerance` away from that anchor
//! starts a new band. Rotated or multi-column layouts are not handled.

use tracing::debug;

use super::WordToken;

/// Default vertical tolerance between a word and its band's first word.
pub const DEFAULT_ROW_TOLERANCE: f32 = 15.0;

/// Groups word tokens into text rows.
#[derive(Debug, Clone)]
pub struct RowGrouper {
    tolerance: f32,
}

impl RowGrouper {
    /// Create a grouper with the default tolerance.
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_ROW_TOLERANCE,
        }
    }

    /// Set the vertical tolerance.
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Group words into rows, top-to-bottom, each row left-to-right.
    pub fn group(&self, words: &[WordToken]) -> Vec<String> {
        let mut sorted: Vec<&WordToken> = words.iter().collect();
        sorted.sort_by(|a, b| a.y.total_cmp(&b.y));

        let mut rows = Vec::new();
        let mut band: Vec<&WordToken> = Vec::new();
        let mut band_y = f32::NEG_INFINITY;

        for word in sorted {
            // A NaN distance is never within tolerance.
            let within = (word.y - band_y).abs() <= self.tolerance;
            if !band.is_empty() && !within {
                rows.push(join_band(&mut band));
            }
            if band.is_empty() {
                band_y = word.y;
            }
            band.push(word);
        }

        if !band.is_empty() {
            rows.push(join_band(&mut band));
        }

        debug!("Grouped {} words into {} rows", words.len(), rows.len());

        rows
    }
}

impl Default for RowGrouper {
    fn default() -> Self {
        Self::new()
    }
}

fn join_band(band: &mut Vec<&WordToken>) -> String {
    band.sort_by(|a, b| a.x.total_cmp(&b.x));
    let row = band
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    band.clear();
    row
}
