//! Weighted aggregation of the five dimension scores.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Weight of each dimension in the overall score. Sums to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreWeights {
    /// Structure weight.
    pub structure: f64,
    /// Normalized readability weight.
    pub readability: f64,
    /// Link weight.
    pub links: f64,
    /// Style weight.
    pub style: f64,
    /// Terminology weight.
    pub terminology: f64,
}

/// The fixed weight table.
pub const SCORE_WEIGHTS: ScoreWeights = ScoreWeights {
    structure: 0.30,
    readability: 0.20,
    links: 0.20,
    style: 0.15,
    terminology: 0.15,
};

/// Grade at which readability normalizes to exactly 100.
const NORMALIZE_PIVOT: f64 = 8.0;

/// Points lost per grade above the pivot.
const NORMALIZE_SLOPE: f64 = 5.0;

/// Map a Flesch-Kincaid grade to 0..=100: `clamp(100 - (grade - 8) * 5)`.
///
/// Grades below 8 clamp to 100. A non-finite grade maps to 0.
pub fn normalize_readability(grade: f64) -> f64 {
    if !grade.is_finite() {
        return 0.0;
    }
    (100.0 - (grade - NORMALIZE_PIVOT) * NORMALIZE_SLOPE).clamp(0.0, 100.0)
}

/// Combine dimension scores with [`SCORE_WEIGHTS`] and round.
///
/// `grade` is the report's rounded Flesch-Kincaid grade; it is normalized here.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn overall_score(structure: u8, grade: f64, links: u8, style: u8, terminology: u8) -> u8 {
    let w = SCORE_WEIGHTS;
    let total = f64::from(structure) * w.structure
        + normalize_readability(grade) * w.readability
        + f64::from(links) * w.links
        + f64::from(style) * w.style
        + f64::from(terminology) * w.terminology;
    total.round().clamp(0.0, 100.0) as u8
}
