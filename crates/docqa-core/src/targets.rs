//! Score bands and quality-target evaluation.
//!
//! Consumers of a finished [`AnalysisReport`] use these to label scores and
//! to gate on [`QualityTargets`]. Nothing here feeds back into scoring.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::report::AnalysisReport;
use crate::settings::QualityTargets;

/// Score band used for distributions and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    /// 90 to 100.
    Excellent,
    /// 70 to 89.
    Good,
    /// 50 to 69.
    Fair,
    /// Below 50.
    Poor,
}

impl ScoreBand {
    /// Band for a 0..=100 score.
    pub const fn from_score(score: u8) -> Self {
        match score {
            90.. => Self::Excellent,
            70..=89 => Self::Good,
            50..=69 => Self::Fair,
            _ => Self::Poor,
        }
    }

    /// Returns the band as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

impl std::fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five dimension scores as the aggregator saw them, plus the overall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DimensionScores {
    /// Structure score.
    pub structure: u8,
    /// Readability grade normalized to 0..=100.
    pub readability: u8,
    /// Link score.
    pub links: u8,
    /// Style score.
    pub style: u8,
    /// Terminology score.
    pub terminology: u8,
    /// Weighted overall score.
    pub overall: u8,
}

/// One dimension compared to its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TargetCheck {
    /// Dimension name.
    pub dimension: String,
    /// Actual score.
    pub score: u8,
    /// Target score.
    pub target: u8,
    /// Whether `score >= target`.
    pub met: bool,
}

/// All dimensions compared to their targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TargetReport {
    /// Overall first, then the five dimensions.
    pub checks: Vec<TargetCheck>,
    /// Whether every target was met.
    pub pass: bool,
}

impl TargetReport {
    /// Checks that were not met.
    pub fn failures(&self) -> impl Iterator<Item = &TargetCheck> {
        self.checks.iter().filter(|c| !c.met)
    }
}

/// Compare a report against quality targets.
pub fn evaluate_targets(report: &AnalysisReport, targets: &QualityTargets) -> TargetReport {
    let scores = report.dimension_scores();
    let checks: Vec<TargetCheck> = [
        ("overall", scores.overall, targets.overall),
        ("structure", scores.structure, targets.structure),
        ("readability", scores.readability, targets.readability),
        ("links", scores.links, targets.links),
        ("style", scores.style, targets.style),
        ("terminology", scores.terminology, targets.terminology),
    ]
    .into_iter()
    .map(|(dimension, score, target)| TargetCheck {
        dimension: dimension.to_string(),
        score,
        target,
        met: score >= target,
    })
    .collect();

    let pass = checks.iter().all(|c| c.met);
    TargetReport { checks, pass }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze;

    #[test]
    fn band_boundaries() {
        assert_eq!(ScoreBand::from_score(100), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(90), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(89), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(70), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(69), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(50), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(49), ScoreBand::Poor);
        assert_eq!(ScoreBand::from_score(0), ScoreBand::Poor);
    }

    #[test]
    fn empty_document_misses_structure_target() {
        let report = analyze("", None);
        let targets = evaluate_targets(&report, &QualityTargets::default());
        assert!(!targets.pass);
        let failed: Vec<_> = targets.failures().map(|c| c.dimension.as_str()).collect();
        assert_eq!(failed, vec!["structure"]);
        assert_eq!(targets.checks.len(), 6);
        assert_eq!(targets.checks[0].dimension, "overall");
    }

    #[test]
    fn zero_targets_always_pass() {
        let report = analyze("", None);
        let targets = QualityTargets {
            overall: 0,
            structure: 0,
            readability: 0,
            links: 0,
            style: 0,
            terminology: 0,
        };
        assert!(evaluate_targets(&report, &targets).pass);
    }

    #[test]
    fn evaluation_does_not_touch_scores() {
        let report = analyze("# Title\n\nSome text.", None);
        let before = report.dimension_scores();
        let _ = evaluate_targets(&report, &QualityTargets::default());
        assert_eq!(report.dimension_scores(), before);
    }
}
