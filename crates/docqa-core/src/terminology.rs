//! Terminology consistency.
//!
//! Two passes over the document:
//!
//! 1. **Glossary**: for each entry, every surface form (the term and its
//!    alternatives) is matched as a whole word, case-insensitively. When the
//!    matched text takes more than one literal spelling, the entry is
//!    inconsistent.
//! 2. **Capitalization**: whitespace tokens stripped to word characters and
//!    longer than two characters are grouped by lowercase form. A group with
//!    more than one casing is inconsistent.
//!
//! Occurrences carry real positions: 1-based line, 0-based char column of
//! the matched text, and a bounded excerpt of the source line as context.
//! Scanning keeps only byte spans; positions and excerpts are built for
//! reported issues alone, in one pass over the text.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::settings::GlossaryTerm;
use crate::text::LineIndex;

/// Points deducted per inconsistency.
const INCONSISTENCY_PENALTY: usize = 10;

/// Tokens must be longer than this (in chars) to join the capitalization pass.
const MIN_TOKEN_CHARS: usize = 2;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").expect("valid regex"));

/// Result of terminology analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TerminologyReport {
    /// Score from 0 to 100.
    pub score: u8,
    /// Glossary inconsistencies first, then capitalization ones.
    pub inconsistencies: Vec<TerminologyIssue>,
    /// The glossary that was applied.
    pub glossary: Vec<GlossaryTerm>,
}

/// A term that appears in more than one form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TerminologyIssue {
    /// Glossary term, or the lowercase key for capitalization issues.
    pub term: String,
    /// Distinct spellings found, in first-seen order.
    pub alternatives: Vec<String>,
    /// Every occurrence, in document order.
    pub occurrences: Vec<TermOccurrence>,
    /// How to fix it.
    pub suggestion: String,
}

/// Where a term occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TermOccurrence {
    /// Literal text as it appears.
    pub text: String,
    /// 1-based line.
    pub line: usize,
    /// 0-based column in chars.
    pub column: usize,
    /// Trimmed excerpt of the source line around the occurrence, at most
    /// [`CONTEXT_RADIUS`] chars either side.
    pub context: String,
}

/// Chars of context kept on each side of an occurrence.
pub const CONTEXT_RADIUS: usize = 40;

/// A match found while scanning. Positions and context are resolved only
/// for spans of reported issues.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
    variant: usize,
}

/// An inconsistency whose occurrences are still byte spans.
struct Pending {
    term: String,
    variants: Vec<String>,
    spans: Vec<Span>,
    suggestion: String,
}

/// Index of `value` in `values`, appending it if absent.
fn variant_index(values: &mut Vec<String>, value: &str) -> usize {
    values.iter().position(|v| v == value).unwrap_or_else(|| {
        values.push(value.to_string());
        values.len() - 1
    })
}

/// Check terminology consistency against `glossary` and by capitalization.
#[tracing::instrument(skip_all, fields(text_len = text.len(), glossary = glossary.len()))]
pub fn analyze_terminology(text: &str, glossary: Vec<GlossaryTerm>) -> TerminologyReport {
    let mut pending: Vec<Pending> = glossary
        .iter()
        .filter_map(|entry| check_glossary_entry(text, entry))
        .collect();
    pending.extend(check_capitalization(text));

    let inconsistencies = resolve(text, pending);
    let score = 100usize.saturating_sub(inconsistencies.len() * INCONSISTENCY_PENALTY);

    tracing::debug!(inconsistencies = inconsistencies.len(), "terminology checked");

    TerminologyReport {
        score: u8::try_from(score).unwrap_or(0),
        inconsistencies,
        glossary,
    }
}

/// Turn spans into occurrences with one shared pass over the text.
fn resolve(text: &str, pending: Vec<Pending>) -> Vec<TerminologyIssue> {
    let index = LineIndex::new(text);
    let mut starts: Vec<usize> = pending
        .iter()
        .flat_map(|p| p.spans.iter().map(|s| s.start))
        .collect();
    starts.sort_unstable();
    starts.dedup();
    let positions = index.positions(&starts);

    pending
        .into_iter()
        .map(|p| {
            let occurrences = p
                .spans
                .iter()
                .map(|s| {
                    let (line, column) = starts
                        .binary_search(&s.start)
                        .map_or_else(|_| index.position(s.start), |i| positions[i]);
                    TermOccurrence {
                        text: p.variants[s.variant].clone(),
                        line,
                        column,
                        context: index.context(s.start, s.end, CONTEXT_RADIUS).to_string(),
                    }
                })
                .collect();
            TerminologyIssue {
                term: p.term,
                alternatives: p.variants,
                occurrences,
                suggestion: p.suggestion,
            }
        })
        .collect()
}

fn check_glossary_entry(text: &str, entry: &GlossaryTerm) -> Option<Pending> {
    // Keyed by byte offset so overlapping forms ("API", "api") count once.
    let mut hits: BTreeMap<usize, Span> = BTreeMap::new();
    let mut found = Vec::new();

    for form in entry.surface_forms().filter(|f| !f.is_empty()) {
        let pattern = format!(r"(?i)\b{}\b", regex::escape(form));
        let re = match Regex::new(&pattern) {
            Ok(re) => re,
            Err(e) => {
                tracing::warn!(term = %entry.term, form, error = %e, "skipping glossary form");
                continue;
            }
        };
        for m in re.find_iter(text) {
            let variant = variant_index(&mut found, m.as_str());
            hits.entry(m.start()).or_insert(Span {
                start: m.start(),
                end: m.end(),
                variant,
            });
        }
    }

    if found.len() < 2 {
        return None;
    }

    Some(Pending {
        term: entry.term.clone(),
        variants: found,
        spans: hits.into_values().collect(),
        suggestion: format!(
            "Use consistent terminology: \"{}\"",
            entry.preferred_usage
        ),
    })
}

fn check_capitalization(text: &str) -> Vec<Pending> {
    struct Group {
        key: String,
        variants: Vec<String>,
        spans: Vec<Span>,
    }

    let mut groups: Vec<Group> = Vec::new();
    let mut by_key: HashMap<String, usize> = HashMap::new();

    for token in TOKEN.find_iter(text) {
        let raw = token.as_str();
        let clean: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if clean.chars().count() <= MIN_TOKEN_CHARS {
            continue;
        }

        // Column points at the first kept character.
        let lead = raw
            .find(|c: char| c.is_alphanumeric() || c == '_')
            .unwrap_or(0);
        let key = clean.to_lowercase();
        let slot = match by_key.get(&key) {
            Some(&slot) => slot,
            None => {
                groups.push(Group {
                    key: key.clone(),
                    variants: Vec::new(),
                    spans: Vec::new(),
                });
                by_key.insert(key, groups.len() - 1);
                groups.len() - 1
            }
        };

        let group = &mut groups[slot];
        let variant = variant_index(&mut group.variants, &clean);
        group.spans.push(Span {
            start: token.start() + lead,
            end: token.end(),
            variant,
        });
    }

    groups
        .into_iter()
        .filter(|g| g.variants.len() > 1)
        .map(|g| Pending {
            suggestion: format!("Use consistent capitalization for \"{}\"", g.key),
            term: g.key,
            variants: g.variants,
            spans: g.spans,
        })
        .collect()
}
