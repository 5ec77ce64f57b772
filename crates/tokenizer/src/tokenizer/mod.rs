//! Main tokenizer implementation.
//!
//! This module provides the high-level `Tokenizer` struct that ties a shared
//! model to its encoder, training and persistence.

pub mod stats;

pub use stats::{stats, CompressionStats};

use crate::io::{TokenizerLoader, TokenizerSaver};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use varna_core::{ByteLevelEncoder, Model, Result};
use varna_training::{BpeTrainer, TrainingConfig, TrainingSummary};

/// Configuration for building a tokenizer.
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    /// Target vocabulary size
    pub vocab_size: usize,
    /// Minimum frequency for merges during training
    pub min_frequency: u64,
    /// Use the rayon pool during training
    pub parallel: bool,
    /// Progress log interval during training, in merges
    pub log_interval: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        let training = TrainingConfig::default();
        Self {
            vocab_size: training.vocab_size,
            min_frequency: training.min_frequency,
            parallel: training.parallel,
            log_interval: training.log_interval,
        }
    }
}

impl TokenizerConfig {
    fn training(&self) -> TrainingConfig {
        TrainingConfig {
            vocab_size: self.vocab_size,
            min_frequency: self.min_frequency,
            parallel: self.parallel,
            log_interval: self.log_interval,
        }
    }
}

/// Builder for creating a tokenizer.
#[derive(Debug, Clone, Default)]
pub struct TokenizerBuilder {
    config: TokenizerConfig,
}

impl TokenizerBuilder {
    /// Create a new tokenizer builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target vocabulary size.
    pub fn vocab_size(mut self, size: usize) -> Self {
        self.config.vocab_size = size;
        self
    }

    /// Set the minimum frequency for merges.
    pub fn min_frequency(mut self, freq: u64) -> Self {
        self.config.min_frequency = freq;
        self
    }

    /// Enable or disable parallel training.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Set the progress log interval.
    pub fn log_interval(mut self, merges: usize) -> Self {
        self.config.log_interval = merges;
        self
    }

    /// Build an untrained tokenizer (byte tokens only).
    pub fn build(self) -> Result<Tokenizer> {
        Tokenizer::new(self.config)
    }
}

/// Main tokenizer struct.
///
/// Cloning is cheap: clones share the same read-only model.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    /// Configuration
    config: TokenizerConfig,
    /// Byte-level encoder over the shared model
    encoder: ByteLevelEncoder,
}

impl Tokenizer {
    /// Create an untrained tokenizer with the given configuration.
    pub fn new(config: TokenizerConfig) -> Result<Self> {
        let model = Model::new(config.vocab_size)?;
        Ok(Self {
            config,
            encoder: ByteLevelEncoder::new(Arc::new(model)),
        })
    }

    /// Wrap an existing model.
    pub fn from_model(model: Model) -> Self {
        let config = TokenizerConfig {
            vocab_size: model.vocab_size(),
            ..Default::default()
        };
        Self {
            config,
            encoder: ByteLevelEncoder::new(Arc::new(model)),
        }
    }

    /// Create a tokenizer builder.
    pub fn builder() -> TokenizerBuilder {
        TokenizerBuilder::new()
    }

    /// Train on a single text, replacing the current model.
    pub fn train(&mut self, data: &str) -> Result<TrainingSummary> {
        self.train_from_iter(std::iter::once(data))
    }

    /// Train on a sequence of documents, replacing the current model.
    pub fn train_from_iter<I, S>(&mut self, documents: I) -> Result<TrainingSummary>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let trainer = BpeTrainer::new(self.config.training());
        let (model, summary) = trainer.train_from_iter(documents)?;
        self.encoder = ByteLevelEncoder::new(Arc::new(model));
        Ok(summary)
    }

    /// Encode text to token IDs. Never fails.
    pub fn encode(&self, text: &str) -> Encoding {
        Encoding {
            ids: self.encoder.encode(text),
            text: text.to_string(),
        }
    }

    /// Encode a batch of texts (parallelized).
    pub fn encode_batch(&self, texts: &[String]) -> Vec<Encoding> {
        texts.par_iter().map(|text| self.encode(text)).collect()
    }

    /// Decode token IDs back to text.
    ///
    /// Fails with `UnknownToken` for an ID outside the token table.
    pub fn decode(&self, ids: &[u32]) -> Result<String> {
        self.encoder.decode(ids)
    }

    /// Decode token IDs to raw bytes.
    pub fn decode_bytes(&self, ids: &[u32]) -> Result<Vec<u8>> {
        self.encoder.decode_bytes(ids)
    }

    /// Compression report for `text`.
    pub fn stats(&self, text: &str) -> CompressionStats {
        let ids = self.encoder.encode(text);
        CompressionStats::for_encoding(text, &ids, self.model().len())
    }

    /// Target vocabulary size.
    pub fn vocab_size(&self) -> usize {
        self.model().vocab_size()
    }

    /// Tokens actually in the table.
    pub fn len(&self) -> usize {
        self.model().len()
    }

    /// Always false: the byte tokens are always present.
    pub fn is_empty(&self) -> bool {
        self.model().is_empty()
    }

    /// The shared model.
    pub fn model(&self) -> &Arc<Model> {
        self.encoder.model()
    }

    /// Configuration used for training.
    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Save the tokenizer to a directory or `.json` file.
    pub fn save(&self, path: &Path) -> Result<PathBuf> {
        TokenizerSaver::new(self.model()).save(path)
    }

    /// Load a tokenizer from a directory or `.json` file.
    pub fn load(path: &Path) -> Result<Self> {
        TokenizerLoader::load(path).map(Self::from_model)
    }
}

/// Train a model on `corpus` with default settings and the given size.
pub fn train(corpus: &str, vocab_size: usize) -> Result<Model> {
    BpeTrainer::with_vocab_size(vocab_size)
        .train(corpus)
        .map(|(model, _)| model)
}

/// Result of encoding text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    /// Token IDs
    pub ids: Vec<u32>,
    /// Original text
    pub text: String,
}

impl Encoding {
    /// Get the number of tokens.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the encoding is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Token IDs rendered as decimal strings.
    pub fn ids_as_strings(&self) -> Vec<String> {
        self.ids.iter().map(|id| id.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use varna_core::TokenizerError;

    const CORPUS: &str = "भारत एक महान देश है। भारत की राजधानी नई दिल्ली है। \
                          हिंदी भारत की राजभाषा है। भारत एक महान देश है।";

    fn trained() -> Tokenizer {
        let mut tokenizer = Tokenizer::builder()
            .vocab_size(400)
            .parallel(false)
            .log_interval(0)
            .build()
            .unwrap();
        tokenizer.train(CORPUS).unwrap();
        tokenizer
    }

    #[test]
    fn test_builder() {
        let tokenizer = Tokenizer::builder()
            .vocab_size(1000)
            .min_frequency(5)
            .build()
            .unwrap();

        assert_eq!(tokenizer.vocab_size(), 1000);
        assert_eq!(tokenizer.len(), 256);
        assert_eq!(tokenizer.config().min_frequency, 5);
    }

    #[test]
    fn test_builder_rejects_small_vocab() {
        let err = Tokenizer::builder().vocab_size(256).build().unwrap_err();
        assert!(matches!(err, TokenizerError::InvalidVocabSize { .. }));
    }

    #[test]
    fn test_untrained_roundtrip() {
        let tokenizer = Tokenizer::builder().build().unwrap();

        let text = "Hello, world! नमस्ते";
        let encoding = tokenizer.encode(text);
        assert_eq!(encoding.len(), text.len());
        assert_eq!(tokenizer.decode(&encoding.ids).unwrap(), text);
    }

    #[test]
    fn test_train_compresses() {
        let tokenizer = trained();
        assert!(tokenizer.len() > 256 && tokenizer.len() <= 400);

        let text = "भारत एक महान देश है।";
        let encoding = tokenizer.encode(text);
        assert!(encoding.len() < text.len());
        assert_eq!(tokenizer.decode(&encoding.ids).unwrap(), text);
        assert!(tokenizer.stats(text).ratio > 1.0);
    }

    #[test]
    fn test_ids_as_strings() {
        let tokenizer = Tokenizer::builder().build().unwrap();
        let encoding = tokenizer.encode("अ");

        // Three UTF-8 bytes, no merges
        assert_eq!(encoding.ids_as_strings(), vec!["224", "164", "133"]);

        let parsed: Vec<u32> = encoding
            .ids_as_strings()
            .iter()
            .map(|id| id.parse().unwrap())
            .collect();
        assert_eq!(parsed, encoding.ids);
    }

    #[test]
    fn test_decode_unknown_token() {
        let tokenizer = trained();
        let err = tokenizer.decode(&[999_999]).unwrap_err();
        assert!(matches!(err, TokenizerError::UnknownToken(999_999)));
    }

    #[test]
    fn test_encode_batch_matches_encode() {
        let tokenizer = trained();
        let texts: Vec<String> = CORPUS.split('।').map(str::to_string).collect();

        let batch = tokenizer.encode_batch(&texts);
        assert_eq!(batch.len(), texts.len());
        for (encoding, text) in batch.iter().zip(&texts) {
            assert_eq!(encoding, &tokenizer.encode(text));
        }
    }

    #[test]
    fn test_stats_matches_free_function() {
        let tokenizer = trained();
        let text = "हिंदी भारत की राजभाषा है।";
        assert_eq!(tokenizer.stats(text), stats(text, tokenizer.model()));
    }

    #[test]
    fn test_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let tokenizer = trained();
        tokenizer.save(dir.path()).unwrap();

        let loaded = Tokenizer::load(dir.path()).unwrap();
        assert_eq!(loaded.model(), tokenizer.model());
        assert_eq!(loaded.vocab_size(), 400);

        let text = "नई दिल्ली";
        assert_eq!(loaded.encode(text), tokenizer.encode(text));
    }

    #[test]
    fn test_free_train() {
        let model = train(CORPUS, 300).unwrap();
        assert!(model.len() <= 300);
        assert!(matches!(
            train(CORPUS, 10),
            Err(TokenizerError::InvalidVocabSize { requested: 10 })
        ));
    }
}
