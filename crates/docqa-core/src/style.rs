//! Style guide compliance.
//!
//! Rules run line by line. The built-in rules are gated by the enabled check
//! ids in [`StyleGuideConfig`]; custom rules always run. Each rule compiles
//! once per analysis, and a custom rule whose pattern fails to compile is
//! skipped with a warning while the others still apply.

use std::sync::LazyLock;

use aho_corasick::AhoCorasick;
use regex::{Regex, RegexBuilder};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::settings::{CustomRule, Severity, StyleCheck, StyleGuideConfig};
use crate::text;

/// Points deducted per issue.
const ISSUE_PENALTY: usize = 5;

static CLICK_HERE: LazyLock<AhoCorasick> = LazyLock::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(["click here"])
        .expect("valid pattern")
});

/// Forms of "to be" followed by a word ending in "ed". Case-sensitive, so
/// "Was" at the start of a sentence does not match.
static PASSIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(is|are|was|were|being|been)\s+\w+ed\b").expect("valid regex")
});

/// Result of style analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StyleReport {
    /// Score from 0 to 100.
    pub score: u8,
    /// Issues in line order; within a line, in rule order.
    pub issues: Vec<StyleIssue>,
    /// `round((lines - issues) / lines * 100)`. Negative when a document
    /// has more issues than lines.
    pub adherence_percentage: i64,
}

/// Style issue category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum StyleCategory {
    /// Word choice.
    Terminology,
    /// Link text and custom rules.
    Formatting,
    /// Voice.
    Tone,
    /// Sentence construction.
    Grammar,
}

/// A single style issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StyleIssue {
    /// Category.
    #[serde(rename = "type")]
    pub category: StyleCategory,
    /// Human-readable description.
    pub message: String,
    /// 1-based line.
    pub line: usize,
    /// 0-based column in chars.
    pub column: usize,
    /// Severity.
    pub severity: Severity,
    /// How to fix it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Id of the rule that produced the issue: a check id or a custom rule name.
    pub rule: String,
}

/// A compiled style rule.
#[derive(Debug)]
enum StyleRule {
    ClickHere,
    PassiveVoice,
    SentenceLength { max: usize },
    Custom { rule: CustomRule, regex: Regex },
}

impl StyleRule {
    fn check(&self, line: &str, line_no: usize, out: &mut Vec<StyleIssue>) {
        match self {
            Self::ClickHere => {
                if let Some(m) = CLICK_HERE.find(line) {
                    out.push(StyleIssue {
                        category: StyleCategory::Formatting,
                        message: "Avoid using \"click here\" in links".to_string(),
                        line: line_no,
                        column: line[..m.start()].chars().count(),
                        severity: Severity::Warning,
                        suggestion: Some(
                            "Use descriptive link text that explains what the link does"
                                .to_string(),
                        ),
                        rule: StyleCheck::ClickHere.as_str().to_string(),
                    });
                }
            }
            Self::PassiveVoice => {
                if PASSIVE.is_match(line) {
                    out.push(StyleIssue {
                        category: StyleCategory::Tone,
                        message: "Consider using active voice instead of passive voice"
                            .to_string(),
                        line: line_no,
                        column: 0,
                        severity: Severity::Info,
                        suggestion: Some("Rewrite in active voice for clarity".to_string()),
                        rule: StyleCheck::PassiveVoice.as_str().to_string(),
                    });
                }
            }
            Self::SentenceLength { max } => {
                for sentence in text::split_sentences(line) {
                    let words = text::split_words(sentence).len();
                    if words > *max {
                        out.push(StyleIssue {
                            category: StyleCategory::Grammar,
                            message: format!("Sentence is too long ({words} words, max: {max})"),
                            line: line_no,
                            column: 0,
                            severity: Severity::Info,
                            suggestion: Some("Break this sentence into smaller parts".to_string()),
                            rule: StyleCheck::SentenceLength.as_str().to_string(),
                        });
                    }
                }
            }
            Self::Custom { rule, regex } => {
                if regex.is_match(line) {
                    out.push(StyleIssue {
                        category: StyleCategory::Formatting,
                        message: rule.message.clone(),
                        line: line_no,
                        column: 0,
                        severity: rule.severity,
                        suggestion: Some(format!("Custom rule: {}", rule.name)),
                        rule: rule.name.clone(),
                    });
                }
            }
        }
    }
}

/// Build the rule list in evaluation order.
fn compile_rules(config: &StyleGuideConfig, max_sentence_length: usize) -> Vec<StyleRule> {
    let mut rules = Vec::new();

    for id in &config.enabled_checks {
        if id.parse::<StyleCheck>().is_err() {
            tracing::debug!(check = %id, "ignoring unknown style check");
        }
    }

    if config.is_enabled(StyleCheck::ClickHere) {
        rules.push(StyleRule::ClickHere);
    }
    if config.is_enabled(StyleCheck::PassiveVoice) {
        rules.push(StyleRule::PassiveVoice);
    }
    if config.is_enabled(StyleCheck::SentenceLength) {
        rules.push(StyleRule::SentenceLength {
            max: max_sentence_length,
        });
    }

    for rule in &config.custom_rules {
        match RegexBuilder::new(&rule.pattern)
            .case_insensitive(true)
            .build()
        {
            Ok(regex) => rules.push(StyleRule::Custom {
                rule: rule.clone(),
                regex,
            }),
            Err(e) => {
                tracing::warn!(rule = %rule.name, error = %e, "skipping custom rule with invalid pattern");
            }
        }
    }

    rules
}

/// Check style compliance line by line.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn analyze_style(
    text: &str,
    config: &StyleGuideConfig,
    max_sentence_length: usize,
) -> StyleReport {
    let rules = compile_rules(config, max_sentence_length);
    let mut issues = Vec::new();
    let mut line_count = 0usize;

    for (index, line) in text.split('\n').enumerate() {
        line_count += 1;
        for rule in &rules {
            rule.check(line, index + 1, &mut issues);
        }
    }

    let score = 100usize.saturating_sub(issues.len() * ISSUE_PENALTY);
    let adherence_percentage = adherence(line_count, issues.len());

    tracing::debug!(
        rules = rules.len(),
        issues = issues.len(),
        "style checked"
    );

    StyleReport {
        score: u8::try_from(score).unwrap_or(0),
        issues,
        adherence_percentage,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn adherence(lines: usize, issues: usize) -> i64 {
    let lines = lines.max(1) as f64;
    // Halves round up, so -12.5 becomes -12.
    ((lines - issues as f64) / lines * 100.0 + 0.5).floor() as i64
}
