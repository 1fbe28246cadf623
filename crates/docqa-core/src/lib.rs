//! Core library for docqa.
//!
//! Analyzes a markdown or prose document across five dimensions (heading
//! structure, links, style, readability, terminology) and combines them
//! into one weighted quality score.
//!
//! # Modules
//!
//! - [`structure`], [`readability`], [`links`], [`style`], [`terminology`]:
//!   the independent analyzers
//! - [`score`]: the fixed weight table and aggregation
//! - [`targets`]: score bands and quality-target evaluation
//! - [`settings`]: analysis settings with defaults
//! - [`config`]: configuration loading and management
//! - [`error`]: error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use docqa_core::{Settings, analyze};
//!
//! let report = analyze("# Guide\n\nRead the [docs](docs.md).", Some(&Settings::default()));
//! assert_eq!(report.links.total_links, 1);
//! assert!(report.overall_score <= 100);
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod links;
pub mod readability;
pub mod report;
pub mod score;
pub mod settings;
pub mod structure;
pub mod style;
pub mod targets;
pub mod terminology;
pub mod text;

pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use error::{AnalysisError, AnalysisResult, ConfigError, ConfigResult};
pub use report::AnalysisReport;
pub use settings::Settings;
pub use targets::{DimensionScores, ScoreBand, TargetReport, evaluate_targets};

use chrono::Utc;
use uuid::Uuid;

/// Default maximum input size: 5 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;

/// Reject input larger than `limit` bytes. `None` disables the check.
pub const fn validate_input_size(text: &str, limit: Option<usize>) -> AnalysisResult<()> {
    match limit {
        Some(limit) if text.len() > limit => Err(AnalysisError::InputTooLarge {
            size: text.len(),
            limit,
        }),
        _ => Ok(()),
    }
}

/// Analyze a document.
///
/// Runs every analyzer over `text` and combines their scores. With no
/// settings, every default applies. Never fails and never panics for any
/// string input; the only nondeterministic fields are `document_id` and
/// `timestamp`.
#[tracing::instrument(skip_all, fields(text_len = text.len(), custom_settings = settings.is_some()))]
pub fn analyze(text: &str, settings: Option<&Settings>) -> AnalysisReport {
    let defaults;
    let settings = match settings {
        Some(settings) => settings,
        None => {
            defaults = Settings::default();
            &defaults
        }
    };

    let structure = structure::analyze_structure(text, &settings.expected_sections);
    let readability = readability::analyze_readability(text, &settings.readability_targets);
    let links = links::analyze_links(text, &settings.link_check);
    let style = style::analyze_style(
        text,
        &settings.style_guide,
        settings.readability_targets.max_sentence_length,
    );
    let terminology = terminology::analyze_terminology(text, settings.glossary());

    let overall_score = score::overall_score(
        structure.score,
        readability.flesch_kincaid,
        links.score,
        style.score,
        terminology.score,
    );

    tracing::debug!(overall_score, "analysis complete");

    AnalysisReport {
        document_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        structure,
        links,
        style,
        readability,
        terminology,
        overall_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_limit() {
        assert!(validate_input_size("abc", Some(3)).is_ok());
        assert!(validate_input_size("abc", None).is_ok());
        assert_eq!(
            validate_input_size("abcd", Some(3)),
            Err(AnalysisError::InputTooLarge { size: 4, limit: 3 })
        );
    }

    #[test]
    fn input_limit_counts_bytes() {
        assert!(validate_input_size("é", Some(1)).is_err());
    }

    #[test]
    fn empty_document_overall_score() {
        let report = analyze("", None);
        // structure 55, readability 100, links 100, style 100, terminology 100
        assert_eq!(report.overall_score, 87);
    }

    #[test]
    fn each_call_gets_a_fresh_id() {
        let a = analyze("# A", None);
        let b = analyze("# A", None);
        assert_ne!(a.document_id, b.document_id);
        assert_eq!(a.overall_score, b.overall_score);
    }

    #[test]
    fn settings_flow_to_analyzers() {
        let mut settings = Settings::default();
        settings.style_guide.enabled_checks.clear();
        settings.terminology_glossary = Some(Vec::new());
        let report = analyze("click here\nThe API and the api", Some(&settings));
        assert!(report.style.issues.is_empty());
        assert!(report.terminology.glossary.is_empty());
        assert!(report.terminology.inconsistencies.iter().all(|i| i.term != "API"));
    }

    #[test]
    fn report_serializes_with_kebab_case_kinds() {
        let report = analyze("## Section", None);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["structure"]["issues"][0]["type"], "incorrect-hierarchy");
        assert!(json["document_id"].is_string());
        assert!(json["timestamp"].is_string());
    }
}
