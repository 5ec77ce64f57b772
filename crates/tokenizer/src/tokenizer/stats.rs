//! Compression statistics.

use std::fmt;
use varna_core::{encode, Model};

/// How well a model compresses a piece of text.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompressionStats {
    /// Number of tokens the text encodes to
    pub token_count: usize,
    /// UTF-8 bytes in the text
    pub byte_count: usize,
    /// Unicode scalar values in the text
    pub char_count: usize,
    /// Bytes per token (0.0 for empty text)
    pub ratio: f64,
    /// Tokens in the model's table
    pub vocab_size: usize,
}

impl CompressionStats {
    /// Build a report from raw counts.
    pub fn new(token_count: usize, byte_count: usize, char_count: usize, vocab_size: usize) -> Self {
        let ratio = if token_count == 0 {
            0.0
        } else {
            byte_count as f64 / token_count as f64
        };
        Self {
            token_count,
            byte_count,
            char_count,
            ratio,
            vocab_size,
        }
    }

    /// Report for `ids`, the encoding of `text`.
    pub fn for_encoding(text: &str, ids: &[u32], vocab_size: usize) -> Self {
        Self::new(ids.len(), text.len(), text.chars().count(), vocab_size)
    }

    /// Aggregate several reports; the ratio is total bytes over total tokens.
    pub fn combine<'a>(reports: impl IntoIterator<Item = &'a CompressionStats>) -> Self {
        let (tokens, bytes, chars, vocab) =
            reports
                .into_iter()
                .fold((0, 0, 0, 0), |(tokens, bytes, chars, vocab), report| {
                    (
                        tokens + report.token_count,
                        bytes + report.byte_count,
                        chars + report.char_count,
                        vocab.max(report.vocab_size),
                    )
                });
        Self::new(tokens, bytes, chars, vocab)
    }

    /// Characters per token (0.0 for empty text).
    pub fn chars_per_token(&self) -> f64 {
        if self.token_count == 0 {
            0.0
        } else {
            self.char_count as f64 / self.token_count as f64
        }
    }
}

impl fmt::Display for CompressionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} chars, {} bytes -> {} tokens (ratio {:.2}, vocab {})",
            self.char_count, self.byte_count, self.token_count, self.ratio, self.vocab_size
        )
    }
}

/// Compression report for `text` under `model`.
pub fn stats(text: &str, model: &Model) -> CompressionStats {
    let ids = encode(text, model);
    CompressionStats::for_encoding(text, &ids, model.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        let model = Model::new(300).unwrap();
        let report = stats("", &model);
        assert_eq!(report.token_count, 0);
        assert_eq!(report.byte_count, 0);
        assert_eq!(report.ratio, 0.0);
    }

    #[test]
    fn test_byte_model_ratio_is_one() {
        let model = Model::new(300).unwrap();
        let report = stats("नमस्ते", &model);
        assert_eq!(report.char_count, 6);
        assert_eq!(report.byte_count, 18);
        assert_eq!(report.token_count, 18);
        assert_eq!(report.ratio, 1.0);
        assert_eq!(report.vocab_size, 256);
    }

    #[test]
    fn test_merges_raise_ratio() {
        let mut model = Model::new(300).unwrap();
        model.add_merge((0xE0, 0xA4)).unwrap();
        let report = stats("नमस्ते", &model);
        assert_eq!(report.token_count, 12);
        assert_eq!(report.ratio, 1.5);
    }

    #[test]
    fn test_combine() {
        let a = CompressionStats::new(10, 30, 10, 300);
        let b = CompressionStats::new(5, 5, 5, 300);
        let total = CompressionStats::combine([&a, &b]);
        assert_eq!(total.token_count, 15);
        assert_eq!(total.byte_count, 35);
        assert!((total.ratio - 35.0 / 15.0).abs() < 1e-9);
        assert_eq!(CompressionStats::combine([]).ratio, 0.0);
    }
}
