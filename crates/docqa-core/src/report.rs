//! The combined analysis report.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::links::LinkReport;
use crate::readability::ReadabilityReport;
use crate::score::normalize_readability;
use crate::structure::StructureReport;
use crate::style::StyleReport;
use crate::targets::DimensionScores;
use crate::terminology::TerminologyReport;

/// Everything one call to [`analyze`](crate::analyze) produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisReport {
    /// Fresh identifier for this analysis.
    pub document_id: Uuid,
    /// When the analysis ran.
    pub timestamp: DateTime<Utc>,
    /// Heading structure.
    pub structure: StructureReport,
    /// Inline links.
    pub links: LinkReport,
    /// Style guide compliance.
    pub style: StyleReport,
    /// Flesch-Kincaid readability.
    pub readability: ReadabilityReport,
    /// Terminology consistency.
    pub terminology: TerminologyReport,
    /// Weighted overall score, 0 to 100.
    pub overall_score: u8,
}

impl AnalysisReport {
    /// Per-dimension scores, with readability normalized the way the
    /// overall score uses it.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn dimension_scores(&self) -> DimensionScores {
        DimensionScores {
            structure: self.structure.score,
            readability: normalize_readability(self.readability.flesch_kincaid).round() as u8,
            links: self.links.score,
            style: self.style.score,
            terminology: self.terminology.score,
            overall: self.overall_score,
        }
    }
}
