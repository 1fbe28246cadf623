//! Inline markdown link extraction.
//!
//! Links are classified syntactically and never fetched: every link counts
//! as valid, and [`LinkCheckSettings`] is accepted without effect.

use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::settings::LinkCheckSettings;
use crate::text::LineIndex;

static INLINE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid regex"));

/// Result of link analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LinkReport {
    /// Score from 0 to 100.
    pub score: u8,
    /// Number of links found.
    pub total_links: usize,
    /// Number of links considered valid.
    pub valid_links: usize,
    /// Links that failed validation.
    pub broken_links: Vec<BrokenLink>,
    /// Links whose target does not start with `http`.
    pub internal_links: Vec<InternalLink>,
    /// Links whose target starts with `http`.
    pub external_links: Vec<ExternalLink>,
}

/// A link that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BrokenLink {
    /// Link text.
    pub text: String,
    /// Link target.
    pub url: String,
    /// 1-based line.
    pub line: usize,
    /// Why validation failed.
    pub error: String,
}

/// A relative, anchor, or other non-http link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InternalLink {
    /// Link text.
    pub text: String,
    /// Link target.
    pub target: String,
    /// 1-based line.
    pub line: usize,
    /// Validation verdict.
    pub is_valid: bool,
}

/// An http(s) link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExternalLink {
    /// Link text.
    pub text: String,
    /// Link target.
    pub url: String,
    /// 1-based line.
    pub line: usize,
    /// Validation verdict.
    pub status: LinkStatus,
}

/// External link status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    /// Considered valid.
    Valid,
    /// Target responded with an error.
    Broken,
    /// Target could not be reached.
    Unreachable,
}

/// Extract and classify inline links.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn analyze_links(text: &str, settings: &LinkCheckSettings) -> LinkReport {
    tracing::debug!(
        check_external = settings.check_external_links,
        "link checking is syntactic only"
    );

    let index = LineIndex::new(text);
    let mut internal_links = Vec::new();
    let mut external_links = Vec::new();

    for caps in INLINE_LINK.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let line = index.line(whole.start());
        let link_text = caps[1].to_string();
        let target = caps[2].to_string();

        if target.starts_with("http") {
            external_links.push(ExternalLink {
                text: link_text,
                url: target,
                line,
                status: LinkStatus::Valid,
            });
        } else {
            internal_links.push(InternalLink {
                text: link_text,
                target,
                line,
                is_valid: true,
            });
        }
    }

    let total_links = internal_links.len() + external_links.len();
    let valid_links = internal_links.iter().filter(|l| l.is_valid).count()
        + external_links
            .iter()
            .filter(|l| l.status == LinkStatus::Valid)
            .count();
    let broken_links = Vec::new();

    LinkReport {
        score: link_score(valid_links, total_links),
        total_links,
        valid_links,
        broken_links,
        internal_links,
        external_links,
    }
}

// valid <= total keeps the percentage within 0..=100.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn link_score(valid: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (valid as f64 / total as f64 * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(text: &str) -> LinkReport {
        analyze_links(text, &LinkCheckSettings::default())
    }

    #[test]
    fn classifies_internal_and_external() {
        let report = analyze("[a](https://x.com) and [b](#y)");
        assert_eq!(report.total_links, 2);
        assert_eq!(report.valid_links, 2);
        assert_eq!(report.external_links.len(), 1);
        assert_eq!(report.internal_links.len(), 1);
        assert!(report.broken_links.is_empty());
        assert_eq!(report.external_links[0].url, "https://x.com");
        assert_eq!(report.internal_links[0].target, "#y");
        assert_eq!(report.score, 100);
    }

    #[test]
    fn line_numbers_count_preceding_newlines() {
        let report = analyze("intro\n\n[docs](./docs.md)\ntext [site](http://example.org)");
        assert_eq!(report.internal_links[0].line, 3);
        assert_eq!(report.external_links[0].line, 4);
    }

    #[test]
    fn http_prefix_decides_external() {
        let report = analyze("[x](httpfoo) [y](ftp://host) [z](HTTP://caps)");
        assert_eq!(report.external_links.len(), 1);
        assert_eq!(report.external_links[0].url, "httpfoo");
        assert_eq!(report.internal_links.len(), 2);
    }

    #[test]
    fn no_links_scores_full() {
        let report = analyze("Just prose, no [brackets without target].");
        assert_eq!(report.total_links, 0);
        assert_eq!(report.score, 100);
    }

    #[test]
    fn empty_text_or_target_is_not_a_link() {
        let report = analyze("[](x) [y]()");
        assert_eq!(report.total_links, 0);
    }

    #[test]
    fn settings_do_not_change_results() {
        let text = "[a](https://blocked.example) [b](b.md)";
        let strict = LinkCheckSettings {
            check_external_links: true,
            timeout_ms: 1,
            retry_count: 0,
            ignored_domains: vec!["blocked.example".into()],
        };
        assert_eq!(analyze(text), analyze_links(text, &strict));
    }

    #[test]
    fn score_rounds() {
        assert_eq!(link_score(2, 3), 67);
        assert_eq!(link_score(0, 4), 0);
        assert_eq!(link_score(5, 5), 100);
    }
}
