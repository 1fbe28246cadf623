//! Analysis settings.
//!
//! Every field has a default, so a partially specified settings value (from a
//! config file, the CLI, or an MCP request) fills in the rest. Several fields
//! are accepted and round-tripped without influencing any analyzer; they are
//! marked *reserved* below.

use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Issue severity shared by structure and style issues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Must be fixed.
    Error,
    /// Should be fixed.
    #[default]
    Warning,
    /// Worth considering.
    Info,
}

impl Severity {
    /// Returns the severity as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The catalog of style checks that can be enabled by id.
///
/// `heading-caps`, `terminology`, and `contractions` are recognized but have
/// no detector, so enabling them produces no issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum StyleCheck {
    /// Heuristic passive-voice detection.
    PassiveVoice,
    /// "click here" link text.
    ClickHere,
    /// Heading capitalization (no detector).
    HeadingCaps,
    /// Sentences longer than the configured maximum.
    SentenceLength,
    /// Terminology within the style pass (no detector).
    Terminology,
    /// Contractions (no detector).
    Contractions,
}

impl StyleCheck {
    /// Every check id, in catalog order.
    pub const ALL: &'static [Self] = &[
        Self::PassiveVoice,
        Self::ClickHere,
        Self::HeadingCaps,
        Self::SentenceLength,
        Self::Terminology,
        Self::Contractions,
    ];

    /// Returns the check id.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PassiveVoice => "passive-voice",
            Self::ClickHere => "click-here",
            Self::HeadingCaps => "heading-caps",
            Self::SentenceLength => "sentence-length",
            Self::Terminology => "terminology",
            Self::Contractions => "contractions",
        }
    }
}

impl std::fmt::Display for StyleCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|check| check.as_str() == s)
            .ok_or_else(|| format!("unknown style check: {s}"))
    }
}

/// A user-defined style rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CustomRule {
    /// Rule name, reported as the issue's rule id.
    pub name: String,
    /// Regular expression, matched case-insensitively against each line.
    pub pattern: String,
    /// Issue message.
    pub message: String,
    /// Issue severity.
    pub severity: Severity,
}

/// Style guide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StyleGuideConfig {
    /// Enabled check ids. Unknown ids are ignored.
    pub enabled_checks: Vec<String>,
    /// Additional regex rules.
    pub custom_rules: Vec<CustomRule>,
    /// Reserved.
    pub ignored_patterns: Vec<String>,
}

impl Default for StyleGuideConfig {
    fn default() -> Self {
        Self {
            enabled_checks: [
                StyleCheck::PassiveVoice,
                StyleCheck::ClickHere,
                StyleCheck::HeadingCaps,
                StyleCheck::SentenceLength,
            ]
            .iter()
            .map(|c| c.as_str().to_string())
            .collect(),
            custom_rules: Vec::new(),
            ignored_patterns: Vec::new(),
        }
    }
}

impl StyleGuideConfig {
    /// Whether `check` appears in the enabled set.
    pub fn is_enabled(&self, check: StyleCheck) -> bool {
        self.enabled_checks.iter().any(|id| id == check.as_str())
    }

    /// Replace the enabled set.
    pub fn set_enabled(&mut self, checks: &[StyleCheck]) {
        self.enabled_checks = checks.iter().map(|c| c.as_str().to_string()).collect();
    }
}

/// Readability thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ReadabilityTargets {
    /// Flesch-Kincaid grade above which a simplification suggestion is made.
    pub target_grade: f64,
    /// Maximum words per sentence.
    pub max_sentence_length: usize,
    /// Informational only.
    pub preferred_reading_level: String,
}

impl Default for ReadabilityTargets {
    fn default() -> Self {
        Self {
            target_grade: 12.0,
            max_sentence_length: 20,
            preferred_reading_level: "High School".to_string(),
        }
    }
}

/// Link checking settings. Reserved: links are validated syntactically only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LinkCheckSettings {
    /// Whether external links would be fetched.
    pub check_external_links: bool,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Retries per link.
    pub retry_count: u32,
    /// Domains that would be skipped.
    pub ignored_domains: Vec<String>,
}

impl Default for LinkCheckSettings {
    fn default() -> Self {
        Self {
            check_external_links: false,
            timeout_ms: 5000,
            retry_count: 2,
            ignored_domains: Vec::new(),
        }
    }
}

/// Per-dimension score targets, compared against a finished report by
/// [`evaluate_targets`](crate::targets::evaluate_targets). Never used in scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct QualityTargets {
    /// Overall score target.
    pub overall: u8,
    /// Structure score target.
    pub structure: u8,
    /// Normalized readability score target.
    pub readability: u8,
    /// Link score target.
    pub links: u8,
    /// Style score target.
    pub style: u8,
    /// Terminology score target.
    pub terminology: u8,
}

impl Default for QualityTargets {
    fn default() -> Self {
        Self {
            overall: 80,
            structure: 85,
            readability: 75,
            links: 95,
            style: 80,
            terminology: 90,
        }
    }
}

/// A section the document is expected to contain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ExpectedSection {
    /// Section name, also the fallback match pattern.
    pub name: String,
    /// Missing required sections are errors; others are info.
    pub required: bool,
    /// Appended to the missing-section message when non-empty.
    pub description: String,
    /// Case-insensitive substrings matched against heading text.
    pub patterns: Vec<String>,
}

/// Expected section configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ExpectedSections {
    /// Use `sections` instead of the built-in list.
    pub enabled: bool,
    /// Sections in display order.
    pub sections: Vec<ExpectedSection>,
    /// Reserved.
    pub allow_custom_sections: bool,
}

impl Default for ExpectedSections {
    fn default() -> Self {
        Self {
            enabled: true,
            sections: Vec::new(),
            allow_custom_sections: true,
        }
    }
}

/// A glossary entry: the preferred spelling of a term and the forms it
/// should not appear as.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GlossaryTerm {
    /// Canonical term.
    pub term: String,
    /// Human-readable definition.
    pub definition: String,
    /// The spelling the suggestion recommends.
    pub preferred_usage: String,
    /// Other surface forms to search for.
    pub alternatives: Vec<String>,
}

impl GlossaryTerm {
    /// The term followed by its alternatives.
    pub fn surface_forms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.term.as_str()).chain(self.alternatives.iter().map(String::as_str))
    }
}

/// The glossary used when none is configured.
pub fn default_glossary() -> Vec<GlossaryTerm> {
    vec![
        GlossaryTerm {
            term: "API".to_string(),
            definition: "Application Programming Interface".to_string(),
            preferred_usage: "API".to_string(),
            alternatives: vec!["api".to_string(), "Api".to_string()],
        },
        GlossaryTerm {
            term: "JavaScript".to_string(),
            definition: "Programming language".to_string(),
            preferred_usage: "JavaScript".to_string(),
            alternatives: vec![
                "javascript".to_string(),
                "Javascript".to_string(),
                "JS".to_string(),
            ],
        },
    ]
}

/// Settings for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Settings {
    /// Style rules.
    pub style_guide: StyleGuideConfig,
    /// Readability thresholds.
    pub readability_targets: ReadabilityTargets,
    /// Reserved link-check options.
    pub link_check: LinkCheckSettings,
    /// Consumer-side score targets.
    pub quality_targets: QualityTargets,
    /// Expected document sections.
    pub expected_sections: ExpectedSections,
    /// Glossary. `None` uses [`default_glossary`]; an empty list disables
    /// glossary matching.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminology_glossary: Option<Vec<GlossaryTerm>>,
}

impl Settings {
    /// The glossary in effect.
    pub fn glossary(&self) -> Vec<GlossaryTerm> {
        self.terminology_glossary
            .clone()
            .unwrap_or_else(default_glossary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = Settings::default();
        assert_eq!(
            settings.style_guide.enabled_checks,
            vec!["passive-voice", "click-here", "heading-caps", "sentence-length"]
        );
        assert!((settings.readability_targets.target_grade - 12.0).abs() < f64::EPSILON);
        assert_eq!(settings.readability_targets.max_sentence_length, 20);
        assert_eq!(settings.quality_targets.links, 95);
        assert!(settings.expected_sections.enabled);
        assert!(settings.expected_sections.sections.is_empty());
        assert!(!settings.link_check.check_external_links);
    }

    #[test]
    fn style_check_ids_round_trip_through_from_str() {
        for check in StyleCheck::ALL {
            assert_eq!(check.as_str().parse::<StyleCheck>().unwrap(), *check);
        }
        assert!("spelling".parse::<StyleCheck>().is_err());
    }

    #[test]
    fn is_enabled_ignores_unknown_ids() {
        let config = StyleGuideConfig {
            enabled_checks: vec!["spelling".into(), "click-here".into()],
            ..Default::default()
        };
        assert!(config.is_enabled(StyleCheck::ClickHere));
        assert!(!config.is_enabled(StyleCheck::PassiveVoice));
    }

    #[test]
    fn missing_glossary_uses_default_seed() {
        let glossary = Settings::default().glossary();
        assert_eq!(glossary.len(), 2);
        assert_eq!(glossary[0].term, "API");
        assert_eq!(glossary[1].alternatives, vec!["javascript", "Javascript", "JS"]);
    }

    #[test]
    fn empty_glossary_stays_empty() {
        let settings = Settings {
            terminology_glossary: Some(Vec::new()),
            ..Default::default()
        };
        assert!(settings.glossary().is_empty());
    }

    #[test]
    fn partial_settings_fill_defaults() {
        let settings: Settings = serde_json::from_str(
            r#"{"readability_targets": {"target_grade": 8}, "style_guide": {"custom_rules": [{"name": "todo", "pattern": "TODO", "message": "Resolve TODOs", "severity": "error"}]}}"#,
        )
        .unwrap();
        assert!((settings.readability_targets.target_grade - 8.0).abs() < f64::EPSILON);
        assert_eq!(settings.readability_targets.max_sentence_length, 20);
        assert_eq!(settings.style_guide.enabled_checks.len(), 4);
        assert_eq!(settings.style_guide.custom_rules[0].severity, Severity::Error);
        assert!(settings.terminology_glossary.is_none());
    }

    #[test]
    fn settings_deserialize_from_yaml() {
        let yaml = r#"
expected_sections:
  enabled: true
  sections:
    - name: Installation
      required: true
      patterns: [install, setup]
terminology_glossary:
  - term: Rust
    preferred_usage: Rust
    alternatives: [rust]
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        let section = &settings.expected_sections.sections[0];
        assert!(section.required);
        assert_eq!(section.patterns, vec!["install", "setup"]);
        assert!(section.description.is_empty());
        let glossary = settings.glossary();
        assert_eq!(glossary.len(), 1);
        assert_eq!(glossary[0].surface_forms().collect::<Vec<_>>(), vec!["Rust", "rust"]);
    }
}
