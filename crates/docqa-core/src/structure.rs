//! Structural analysis of markdown headings.
//!
//! Finds ATX headings line by line, checks that levels never skip, flags
//! duplicate and empty headings, and verifies that the document has an H1
//! plus the expected sections.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::settings::{ExpectedSections, Severity};

/// Sections looked for when no expected sections are configured.
const DEFAULT_SECTIONS: &[&str] = &[
    "introduction",
    "overview",
    "getting started",
    "installation",
    "usage",
    "examples",
];

/// Fewer headings than this earns a "more headings" suggestion.
const MIN_HEADINGS: usize = 3;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("valid regex"));

/// Result of structural analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StructureReport {
    /// Score from 0 to 100.
    pub score: u8,
    /// Issues in detection order.
    pub issues: Vec<StructureIssue>,
    /// Deduplicated improvement suggestions.
    pub suggestions: Vec<String>,
    /// Heading list and hierarchy verdict.
    pub heading_hierarchy: HeadingHierarchy,
}

/// Kind of structural issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StructureIssueKind {
    /// No H1, or an expected section was not found.
    MissingSection,
    /// A heading skips one or more levels.
    IncorrectHierarchy,
    /// Heading text repeats an earlier heading (case-insensitive).
    DuplicateHeading,
    /// Heading with blank text.
    EmptySection,
}

/// A single structural issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StructureIssue {
    /// What went wrong.
    #[serde(rename = "type")]
    pub kind: StructureIssueKind,
    /// Human-readable description.
    pub message: String,
    /// 1-based line, absent for document-level issues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// How serious the issue is.
    pub severity: Severity,
}

/// Heading hierarchy summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HeadingHierarchy {
    /// True when no heading skips a level.
    pub is_valid: bool,
    /// Headings in document order. Flat: `children` is always empty here;
    /// see [`nest_headings`].
    pub structure: Vec<HeadingNode>,
    /// Messages of the hierarchy issues.
    pub issues: Vec<String>,
}

/// A heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HeadingNode {
    /// Heading text after the `#` run, untrimmed of inner whitespace.
    pub text: String,
    /// Level 1 through 6.
    pub level: u8,
    /// 1-based line.
    pub line: usize,
    /// Nested headings.
    pub children: Vec<Self>,
}

/// Analyze heading structure.
#[tracing::instrument(skip_all, fields(bytes = text.len()))]
pub fn analyze_structure(text: &str, expected: &ExpectedSections) -> StructureReport {
    let mut issues = Vec::new();
    let mut headings: Vec<HeadingNode> = Vec::new();
    let mut seen = HashSet::new();
    let mut current_level = 0u8;
    let mut has_h1 = false;

    for (index, line) in text.split('\n').enumerate() {
        let Some(caps) = HEADING.captures(line.trim()) else {
            continue;
        };
        let level = u8::try_from(caps[1].len()).unwrap_or(6);
        let heading = caps[2].to_string();
        let line = index + 1;

        if level == 1 {
            has_h1 = true;
        }

        if level > current_level + 1 {
            issues.push(StructureIssue {
                kind: StructureIssueKind::IncorrectHierarchy,
                message: format!(
                    "Heading level {level} follows level {current_level}, skipping levels"
                ),
                line: Some(line),
                severity: Severity::Warning,
            });
        }

        if heading.trim().is_empty() {
            issues.push(StructureIssue {
                kind: StructureIssueKind::EmptySection,
                message: "Empty heading found".to_string(),
                line: Some(line),
                severity: Severity::Error,
            });
        }

        if !seen.insert(heading.to_lowercase()) {
            issues.push(StructureIssue {
                kind: StructureIssueKind::DuplicateHeading,
                message: format!("Duplicate heading: \"{heading}\""),
                line: Some(line),
                severity: Severity::Warning,
            });
        }

        headings.push(HeadingNode {
            text: heading,
            level,
            line,
            children: Vec::new(),
        });
        current_level = level;
    }

    if !has_h1 {
        issues.push(StructureIssue {
            kind: StructureIssueKind::MissingSection,
            message: "Document should have an H1 heading".to_string(),
            line: None,
            severity: Severity::Error,
        });
    }

    let lowered: Vec<String> = headings.iter().map(|h| h.text.to_lowercase()).collect();
    issues.extend(missing_sections(&lowered, expected));

    let hierarchy_issues: Vec<String> = issues
        .iter()
        .filter(|i| i.kind == StructureIssueKind::IncorrectHierarchy)
        .map(|i| i.message.clone())
        .collect();

    let score = structure_score(&issues);
    let suggestions = suggestions(&issues, headings.len());

    tracing::debug!(
        headings = headings.len(),
        issues = issues.len(),
        score,
        "structure analyzed"
    );

    StructureReport {
        score,
        issues,
        suggestions,
        heading_hierarchy: HeadingHierarchy {
            is_valid: hierarchy_issues.is_empty(),
            structure: headings,
            issues: hierarchy_issues,
        },
    }
}

fn missing_sections(found: &[String], expected: &ExpectedSections) -> Vec<StructureIssue> {
    let contains = |needle: &str| found.iter().any(|h| h.contains(needle));

    if expected.enabled && !expected.sections.is_empty() {
        expected
            .sections
            .iter()
            .filter(|section| {
                let present = if section.patterns.is_empty() {
                    contains(&section.name.to_lowercase())
                } else {
                    section
                        .patterns
                        .iter()
                        .any(|p| contains(&p.to_lowercase()))
                };
                !present
            })
            .map(|section| {
                let prefix = if section.required {
                    "Required"
                } else {
                    "Recommended"
                };
                let mut message = format!("{prefix} section missing: \"{}\"", section.name);
                if !section.description.is_empty() {
                    message.push_str(" - ");
                    message.push_str(&section.description);
                }
                StructureIssue {
                    kind: StructureIssueKind::MissingSection,
                    message,
                    line: None,
                    severity: if section.required {
                        Severity::Error
                    } else {
                        Severity::Info
                    },
                }
            })
            .collect()
    } else {
        DEFAULT_SECTIONS
            .iter()
            .filter(|section| !contains(section))
            .map(|section| StructureIssue {
                kind: StructureIssueKind::MissingSection,
                message: format!("Consider adding a \"{section}\" section"),
                line: None,
                severity: Severity::Info,
            })
            .collect()
    }
}

fn structure_score(issues: &[StructureIssue]) -> u8 {
    let deductions: usize = issues
        .iter()
        .map(|i| match i.severity {
            Severity::Error => 15,
            Severity::Warning => 10,
            Severity::Info => 5,
        })
        .sum();
    100 - u8::try_from(deductions.min(100)).unwrap_or(100)
}

fn suggestions(issues: &[StructureIssue], heading_count: usize) -> Vec<String> {
    let has = |kind| issues.iter().any(|i| i.kind == kind);
    let mut out = Vec::new();

    if has(StructureIssueKind::MissingSection) {
        out.push("Add missing sections to improve document completeness".to_string());
    }
    if has(StructureIssueKind::IncorrectHierarchy) {
        out.push(
            "Fix heading hierarchy to follow proper structure (H1 \u{2192} H2 \u{2192} H3, etc.)"
                .to_string(),
        );
    }
    if heading_count == 0 {
        out.push("Add headings to structure your document better".to_string());
    }
    if heading_count < MIN_HEADINGS {
        out.push("Consider adding more headings to break up large sections".to_string());
    }
    out
}

/// Build a tree from a flat heading list.
///
/// Each heading becomes a child of the nearest preceding heading with a
/// lower level. Headings with no such ancestor are roots.
pub fn nest_headings(flat: &[HeadingNode]) -> Vec<HeadingNode> {
    fn attach(stack: &mut [HeadingNode], roots: &mut Vec<HeadingNode>, node: HeadingNode) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }

    let mut roots = Vec::new();
    let mut stack: Vec<HeadingNode> = Vec::new();

    for heading in flat {
        while stack.last().is_some_and(|top| top.level >= heading.level) {
            if let Some(done) = stack.pop() {
                attach(&mut stack, &mut roots, done);
            }
        }
        stack.push(HeadingNode {
            children: Vec::new(),
            ..heading.clone()
        });
    }
    while let Some(done) = stack.pop() {
        attach(&mut stack, &mut roots, done);
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ExpectedSection;

    fn analyze(text: &str) -> StructureReport {
        analyze_structure(text, &ExpectedSections::default())
    }

    fn count(report: &StructureReport, kind: StructureIssueKind) -> usize {
        report.issues.iter().filter(|i| i.kind == kind).count()
    }

    #[test]
    fn sequential_levels_are_valid() {
        let report = analyze("# One\n## Two\n### Three\n");
        assert_eq!(count(&report, StructureIssueKind::IncorrectHierarchy), 0);
        assert!(report.heading_hierarchy.is_valid);
        assert_eq!(report.heading_hierarchy.structure.len(), 3);
    }

    #[test]
    fn skipped_level_is_flagged_once() {
        let report = analyze("# One\n### Three\n");
        let hierarchy: Vec<_> = report
            .issues
            .iter()
            .filter(|i| i.kind == StructureIssueKind::IncorrectHierarchy)
            .collect();
        assert_eq!(hierarchy.len(), 1);
        assert_eq!(hierarchy[0].line, Some(2));
        assert_eq!(hierarchy[0].severity, Severity::Warning);
        assert_eq!(
            hierarchy[0].message,
            "Heading level 3 follows level 1, skipping levels"
        );
        assert!(!report.heading_hierarchy.is_valid);
        assert_eq!(report.heading_hierarchy.issues, vec![hierarchy[0].message.clone()]);
    }

    #[test]
    fn first_heading_deeper_than_h1_skips_from_zero() {
        let report = analyze("## Section\n");
        assert_eq!(count(&report, StructureIssueKind::IncorrectHierarchy), 1);
        assert!(report.issues.iter().any(|i| i.kind == StructureIssueKind::MissingSection
            && i.severity == Severity::Error
            && i.message == "Document should have an H1 heading"));
    }

    #[test]
    fn duplicate_detection_ignores_case() {
        let report = analyze("# Guide\n## Setup\n## SETUP\n");
        assert_eq!(count(&report, StructureIssueKind::DuplicateHeading), 1);
        let dup = report
            .issues
            .iter()
            .find(|i| i.kind == StructureIssueKind::DuplicateHeading)
            .unwrap();
        assert_eq!(dup.message, "Duplicate heading: \"SETUP\"");
        assert_eq!(dup.line, Some(3));
    }

    #[test]
    fn heading_needs_whitespace_after_hashes() {
        let report = analyze("#Title\n####### Seven\n   # Indented\n");
        let texts: Vec<_> = report
            .heading_hierarchy
            .structure
            .iter()
            .map(|h| h.text.as_str())
            .collect();
        assert_eq!(texts, vec!["Indented"]);
        assert_eq!(report.heading_hierarchy.structure[0].line, 3);
    }

    #[test]
    fn default_sections_report_info() {
        let report = analyze("# Project\n## Installation\n## Usage examples\n");
        let missing: Vec<_> = report
            .issues
            .iter()
            .filter(|i| i.kind == StructureIssueKind::MissingSection)
            .map(|i| i.message.as_str())
            .collect();
        assert_eq!(
            missing,
            vec![
                "Consider adding a \"introduction\" section",
                "Consider adding a \"overview\" section",
                "Consider adding a \"getting started\" section",
            ]
        );
        // three infos
        assert_eq!(report.score, 85);
    }

    #[test]
    fn configured_sections_use_patterns_and_severity() {
        let expected = ExpectedSections {
            enabled: true,
            sections: vec![
                ExpectedSection {
                    name: "Installation".into(),
                    required: true,
                    description: "How to install".into(),
                    patterns: vec!["install".into(), "setup".into()],
                },
                ExpectedSection {
                    name: "License".into(),
                    required: false,
                    ..Default::default()
                },
                ExpectedSection {
                    name: "Usage".into(),
                    required: true,
                    ..Default::default()
                },
            ],
            allow_custom_sections: true,
        };
        let report = analyze_structure("# Tool\n## Setup guide\n## Usage\n", &expected);
        let missing: Vec<_> = report
            .issues
            .iter()
            .filter(|i| i.kind == StructureIssueKind::MissingSection)
            .collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].message, "Recommended section missing: \"License\"");
        assert_eq!(missing[0].severity, Severity::Info);

        let report = analyze_structure("# Tool\n## Usage\n", &expected);
        let required = report
            .issues
            .iter()
            .find(|i| i.severity == Severity::Error)
            .unwrap();
        assert_eq!(
            required.message,
            "Required section missing: \"Installation\" - How to install"
        );
    }

    #[test]
    fn disabled_expected_sections_fall_back_to_defaults() {
        let expected = ExpectedSections {
            enabled: false,
            sections: vec![ExpectedSection {
                name: "License".into(),
                ..Default::default()
            }],
            allow_custom_sections: true,
        };
        let report = analyze_structure("# T\n", &expected);
        assert_eq!(count(&report, StructureIssueKind::MissingSection), 6);
    }

    #[test]
    fn empty_document() {
        let report = analyze("");
        assert!(report.heading_hierarchy.structure.is_empty());
        // H1 error (15) plus six default-section infos (30).
        assert_eq!(report.score, 55);
        assert_eq!(
            report.suggestions,
            vec![
                "Add missing sections to improve document completeness",
                "Add headings to structure your document better",
                "Consider adding more headings to break up large sections",
            ]
        );
    }

    #[test]
    fn deductions_cap_at_one_hundred() {
        let text: String = (0..20).map(|_| "#### Same\n").collect();
        let report = analyze(&text);
        assert_eq!(report.score, 0);
    }

    #[test]
    fn suggestions_are_not_repeated() {
        let report = analyze("# A\n### B\n### C\n##### D\n");
        let fix = report
            .suggestions
            .iter()
            .filter(|s| s.starts_with("Fix heading hierarchy"))
            .count();
        assert_eq!(fix, 1);
        assert_eq!(count(&report, StructureIssueKind::IncorrectHierarchy), 2);
    }

    #[test]
    fn nesting_builds_tree_by_level() {
        let report = analyze("# Root\n## A\n### A1\n## B\n# Second\n### Deep\n");
        let tree = nest_headings(&report.heading_hierarchy.structure);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].children.len(), 2);
        assert_eq!(tree[0].children[0].children[0].text, "A1");
        assert_eq!(tree[0].children[1].text, "B");
        assert_eq!(tree[1].children[0].text, "Deep");
        // Flat list is untouched.
        assert!(
            report
                .heading_hierarchy
                .structure
                .iter()
                .all(|h| h.children.is_empty())
        );
    }

    #[test]
    fn nesting_without_h1_yields_multiple_roots() {
        let report = analyze("## A\n## B\n");
        let tree = nest_headings(&report.heading_hierarchy.structure);
        assert_eq!(tree.len(), 2);
    }
}
