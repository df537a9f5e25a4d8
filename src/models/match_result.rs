use serde::{Deserialize, Serialize};
use std::fmt;

use super::IconId;

/// Similarity of one catalog icon to the user input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub id: IconId,
    /// Fraction of pixels flagged as different, in `[0, 1]`
    pub mismatch: f64,
    pub exact_match: bool,
}

impl MatchResult {
    /// Build a result from a raw mismatching pixel count
    pub fn from_count(id: IconId, different_pixels: usize, total_pixels: usize) -> Self {
        let mismatch = if total_pixels == 0 {
            0.0
        } else {
            different_pixels.min(total_pixels) as f64 / total_pixels as f64
        };
        Self {
            id,
            mismatch,
            exact_match: mismatch == 0.0,
        }
    }
}

/// Which endpoint an input arrived through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Png,
    Svg,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Png => f.write_str("png"),
            InputKind::Svg => f.write_str("svg"),
        }
    }
}
