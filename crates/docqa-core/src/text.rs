//! Text processing utilities.
//!
//! Punctuation-based sentence splitting, whitespace word splitting, the
//! vowel-group syllable heuristic, and byte-offset to line/column mapping
//! shared by the analyzers.

use regex::Regex;
use std::sync::LazyLock;

/// Runs of sentence-terminating punctuation.
static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid regex"));

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'y'];

/// Split text into sentences on runs of `.`, `!`, and `?`.
///
/// Blank pieces are dropped. No abbreviation or decimal handling: `3.14`
/// splits into two pieces.
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_BREAK
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .collect()
}

/// Split text into words on whitespace runs.
pub fn split_words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Count syllables in a word using the vowel-group heuristic.
///
/// Counts non-vowel to vowel transitions (`y` is a vowel), drops one for a
/// trailing `e` when more than one group was found, and never returns less
/// than 1, including for the empty string.
pub fn count_syllables(word: &str) -> usize {
    let lower = word.to_lowercase();
    let mut count = 0usize;
    let mut previous_was_vowel = false;

    for ch in lower.chars() {
        let is_vowel = VOWELS.contains(&ch);
        if is_vowel && !previous_was_vowel {
            count += 1;
        }
        previous_was_vowel = is_vowel;
    }

    if lower.ends_with('e') && count > 1 {
        count -= 1;
    }

    count.max(1)
}

/// Maps byte offsets in a text to 1-based lines and 0-based char columns.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    /// Index the line starts of `text`.
    pub fn new(text: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, line_starts }
    }

    /// 1-based line number containing `offset`.
    ///
    /// Equals the number of newlines before `offset`, plus one.
    pub fn line(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }

    /// 1-based line and 0-based column (in chars) of `offset`.
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let line = self.line(offset);
        let start = self.line_starts[line - 1];
        let column = self.text[start..offset].chars().count();
        (line, column)
    }

    /// Positions of many offsets in one forward pass.
    ///
    /// `offsets` must be sorted ascending. Columns are counted from the
    /// previous offset on the same line, so the whole call is linear in the
    /// text rather than in `offsets.len() * line length`.
    pub fn positions(&self, offsets: &[usize]) -> Vec<(usize, usize)> {
        debug_assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
        let mut out = Vec::with_capacity(offsets.len());
        let (mut cur_line, mut cur_offset, mut cur_col) = (0, 0, 0);
        for &offset in offsets {
            let line = self.line(offset);
            if line != cur_line || offset < cur_offset {
                cur_line = line;
                cur_offset = self.line_starts[line - 1];
                cur_col = 0;
            }
            cur_col += self.text[cur_offset..offset].chars().count();
            cur_offset = offset;
            out.push((line, cur_col));
        }
        out
    }

    /// Trimmed excerpt of the line around `start..end`, at most `radius`
    /// chars either side of the span.
    pub fn context(&self, start: usize, end: usize, radius: usize) -> &'a str {
        let line = self.line(start);
        let line_start = self.line_starts[line - 1];
        let line_end = self
            .line_starts
            .get(line)
            .map_or(self.text.len(), |next| next - 1);
        let end = end.clamp(start, line_end.max(start));

        let from = self.text[line_start..start]
            .char_indices()
            .rev()
            .take(radius)
            .last()
            .map_or(start, |(i, _)| line_start + i);
        let to = self.text[end..line_end.max(end)]
            .char_indices()
            .nth(radius)
            .map_or(line_end.max(end), |(i, _)| end + i);
        self.text[from..to].trim()
    }

    /// The full text of a 1-based line, without its newline.
    pub fn line_text(&self, line: usize) -> &'a str {
        let start = self.line_starts[line - 1];
        let end = self
            .line_starts
            .get(line)
            .map_or(self.text.len(), |next| next - 1);
        &self.text[start..end]
    }
}

/// Round to one decimal place.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
