//! Text splitting for pre-segmentation.
//!
//! The Hindi pattern keeps Devanagari runs together (including vowel signs,
//! viramas and the danda), then falls back to letter runs, digit runs,
//! punctuation runs and whitespace. A single leading space is attached to the
//! following run. Splitting is lossless: the segments always concatenate back
//! to the input.

use regex::Regex;
use std::sync::OnceLock;

/// Pre-segmentation pattern, leftmost alternative first.
///
/// The trailing `\s+` is refined in code: a whitespace run directly followed
/// by non-whitespace leaves its last character for the next segment.
pub const HINDI_PATTERN: &str = r" ?[\x{0900}-\x{097F}]+| ?[\x{0980}-\x{09FF}]+| ?\p{L}+| ?\p{N}+| ?[^\s\p{L}\p{N}]+|\s+";

fn hindi_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(HINDI_PATTERN).expect("pre-segmentation pattern is valid"))
}

/// Text splitter for pre-segmentation.
#[derive(Debug, Clone, Copy)]
pub struct Splitter {
    /// Compiled Hindi pattern
    regex: &'static Regex,
}

impl Splitter {
    /// Create the Devanagari-aware splitter.
    pub fn hindi() -> Self {
        Self {
            regex: hindi_regex(),
        }
    }

    /// Lazily iterate over the segments of `text`.
    pub fn segments<'a>(&self, text: &'a str) -> Segments<'a> {
        Segments {
            regex: self.regex,
            text,
            pos: 0,
        }
    }

    /// Split text into segments.
    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.segments(text).collect()
    }
}

impl Default for Splitter {
    fn default() -> Self {
        Self::hindi()
    }
}

/// Split `text` with the Hindi pattern.
pub fn pre_segment(text: &str) -> Vec<&str> {
    Splitter::hindi().split(text)
}

/// Iterator over the segments of a text. Never yields an empty segment.
pub struct Segments<'a> {
    regex: &'static Regex,
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.pos >= self.text.len() {
            return None;
        }

        let start = self.pos;
        let end = match self.regex.find_at(self.text, start) {
            Some(m) if m.start() == start && m.end() > start => {
                release_last_space(self.text, start, m.end())
            }
            // Uncovered span: emit it as is so nothing is dropped.
            Some(m) if m.start() > start => m.start(),
            _ => self.text.len(),
        };

        self.pos = end;
        Some(&self.text[start..end])
    }
}

/// End of a match, shortened by one character when the match is a whitespace
/// run of two or more characters directly followed by non-whitespace.
fn release_last_space(text: &str, start: usize, end: usize) -> usize {
    let matched = &text[start..end];
    if !matched.chars().all(char::is_whitespace) {
        return end;
    }

    let followed_by_text = text[end..].chars().next().is_some_and(|c| !c.is_whitespace());
    if !followed_by_text {
        return end;
    }

    match matched.char_indices().last() {
        Some((offset, _)) if offset > 0 => start + offset,
        _ => end,
    }
}
