//! Readability scoring using Flesch-Kincaid Grade Level.
//!
//! Formula: `0.39 * (words/sentences) + 11.8 * (syllables/words) - 15.59`
//!
//! Lower grade = more readable. Text is scored as-is, markdown markup
//! included, using the heuristics in [`text`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::settings::ReadabilityTargets;
use crate::text;

/// Words with this many syllables or more count as complex.
const COMPLEX_SYLLABLES: usize = 3;

/// More complex words than this earns a suggestion.
const COMPLEX_WORD_LIMIT: usize = 10;

/// Result of readability analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReadabilityReport {
    /// Flesch-Kincaid Grade Level, rounded to one decimal.
    pub flesch_kincaid: f64,
    /// Words per sentence, rounded to one decimal.
    pub average_sentence_length: f64,
    /// Words per sentence, unrounded.
    pub average_words_per_sentence: f64,
    /// Words with three or more syllables.
    pub complex_words: usize,
    /// Reading level band for the grade.
    pub reading_level: ReadingLevel,
    /// Improvement suggestions.
    pub suggestions: Vec<String>,
    /// Number of sentences detected.
    pub sentences: usize,
    /// Number of words detected.
    pub words: usize,
    /// Total syllable count.
    pub syllables: usize,
}

/// Reading level band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ReadingLevel {
    /// Grade 5 and below.
    Elementary,
    /// Grades above 5 up to 8.
    #[serde(rename = "Middle School")]
    MiddleSchool,
    /// Grades above 8 up to 12.
    #[serde(rename = "High School")]
    HighSchool,
    /// Grades above 12 up to 16.
    College,
    /// Above grade 16.
    Graduate,
}

impl ReadingLevel {
    /// Band for an (unrounded) grade.
    pub fn from_grade(grade: f64) -> Self {
        if grade <= 5.0 {
            Self::Elementary
        } else if grade <= 8.0 {
            Self::MiddleSchool
        } else if grade <= 12.0 {
            Self::HighSchool
        } else if grade <= 16.0 {
            Self::College
        } else {
            Self::Graduate
        }
    }

    /// Display label.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Elementary => "Elementary",
            Self::MiddleSchool => "Middle School",
            Self::HighSchool => "High School",
            Self::College => "College",
            Self::Graduate => "Graduate",
        }
    }
}

impl std::fmt::Display for ReadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score readability of text.
///
/// Never fails: with no words or no sentences the grade and averages are
/// `0.0` and the level is [`ReadingLevel::Elementary`].
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn analyze_readability(text: &str, targets: &ReadabilityTargets) -> ReadabilityReport {
    let sentences = text::split_sentences(text).len();
    let word_list = text::split_words(text);
    let words = word_list.len();

    let syllable_counts: Vec<usize> = word_list.iter().map(|w| text::count_syllables(w)).collect();
    let syllables: usize = syllable_counts.iter().sum();
    let complex_words = syllable_counts
        .iter()
        .filter(|&&n| n >= COMPLEX_SYLLABLES)
        .count();

    let (grade, words_per_sentence) = if words == 0 || sentences == 0 {
        (0.0, 0.0)
    } else {
        let words_per_sentence = words as f64 / sentences as f64;
        let syllables_per_word = syllables as f64 / words as f64;
        let grade = 0.39f64.mul_add(words_per_sentence, 11.8 * syllables_per_word) - 15.59;
        (grade, words_per_sentence)
    };

    let suggestions = suggestions(grade, words_per_sentence, complex_words, targets);

    tracing::debug!(sentences, words, syllables, grade, "readability scored");

    ReadabilityReport {
        flesch_kincaid: text::round1(grade),
        average_sentence_length: text::round1(words_per_sentence),
        average_words_per_sentence: words_per_sentence,
        complex_words,
        reading_level: ReadingLevel::from_grade(grade),
        suggestions,
        sentences,
        words,
        syllables,
    }
}

fn suggestions(
    grade: f64,
    words_per_sentence: f64,
    complex_words: usize,
    targets: &ReadabilityTargets,
) -> Vec<String> {
    let mut out = Vec::new();
    if grade > targets.target_grade {
        out.push(format!(
            "Consider simplifying language for better readability (target: {})",
            targets.target_grade
        ));
    }
    if words_per_sentence > targets.max_sentence_length as f64 {
        out.push(format!(
            "Break up long sentences to improve clarity (max: {} words)",
            targets.max_sentence_length
        ));
    }
    if complex_words > COMPLEX_WORD_LIMIT {
        out.push("Replace complex words with simpler alternatives where possible".to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(text: &str) -> ReadabilityReport {
        analyze_readability(text, &ReadabilityTargets::default())
    }

    #[test]
    fn short_document_scores_elementary() {
        let report =
            score("# T\n\nThis is a simple test sentence. This is another sentence for testing.");
        assert_eq!(report.sentences, 2);
        assert_eq!(report.words, 14);
        assert_eq!(report.syllables, 20);
        assert_eq!(report.complex_words, 2);
        assert!((report.flesch_kincaid - 4.0).abs() < 1e-9);
        assert!((report.average_sentence_length - 7.0).abs() < 1e-9);
        assert_eq!(report.reading_level, ReadingLevel::Elementary);
        assert!(report.suggestions.is_empty());
    }

    #[test]
    fn empty_input_is_guarded() {
        for text in ["", "   \n\n", "...", "!?"] {
            let report = score(text);
            assert!(report.flesch_kincaid.abs() < f64::EPSILON, "{text:?}");
            assert!(report.average_words_per_sentence.abs() < f64::EPSILON);
            assert_eq!(report.reading_level, ReadingLevel::Elementary);
            assert!(report.suggestions.is_empty());
        }
    }

    #[test]
    fn dense_text_triggers_all_suggestions() {
        let text = "The implementation of the comprehensive organizational restructuring \
                    initiative necessitated the establishment of interdepartmental \
                    communication protocols that facilitated the dissemination of \
                    procedural documentation across every operational division.";
        let report = score(text);
        assert!(report.flesch_kincaid > 12.0);
        assert!(report.complex_words > 10);
        assert_eq!(
            report.suggestions,
            vec![
                "Consider simplifying language for better readability (target: 12)",
                "Break up long sentences to improve clarity (max: 20 words)",
                "Replace complex words with simpler alternatives where possible",
            ]
        );
    }

    #[test]
    fn targets_change_suggestions_not_grade() {
        let text = "We ship the tool. It runs on every machine we own today.";
        let strict = ReadabilityTargets {
            target_grade: 0.0,
            max_sentence_length: 3,
            ..Default::default()
        };
        let loose = score(text);
        let tight = analyze_readability(text, &strict);
        assert!((loose.flesch_kincaid - tight.flesch_kincaid).abs() < f64::EPSILON);
        assert!(loose.suggestions.is_empty());
        assert_eq!(tight.suggestions.len(), 2);
    }

    #[test]
    fn level_bands() {
        assert_eq!(ReadingLevel::from_grade(-3.0), ReadingLevel::Elementary);
        assert_eq!(ReadingLevel::from_grade(5.0), ReadingLevel::Elementary);
        assert_eq!(ReadingLevel::from_grade(5.01), ReadingLevel::MiddleSchool);
        assert_eq!(ReadingLevel::from_grade(8.0), ReadingLevel::MiddleSchool);
        assert_eq!(ReadingLevel::from_grade(12.0), ReadingLevel::HighSchool);
        assert_eq!(ReadingLevel::from_grade(16.0), ReadingLevel::College);
        assert_eq!(ReadingLevel::from_grade(16.1), ReadingLevel::Graduate);
    }

    #[test]
    fn level_serializes_as_label() {
        let json = serde_json::to_string(&ReadingLevel::MiddleSchool).unwrap();
        assert_eq!(json, "\"Middle School\"");
    }
}
