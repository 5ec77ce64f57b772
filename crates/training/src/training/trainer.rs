//! BPE trainer implementation.
//!
//! This module implements the core BPE training algorithm: repeatedly merge
//! the most frequent adjacent pair across the distinct pre-segments of the
//! corpus until the vocabulary is full or no pair repeats.

use super::counter::PairCounter;
use ahash::{AHashMap, AHashSet};
use tracing::{debug, info, warn};
use varna_core::{Model, Pair, PairPriorityQueue, Result, TokenizerError};

/// Configuration for BPE training.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Target vocabulary size
    pub vocab_size: usize,
    /// Minimum frequency for a pair to be merged
    pub min_frequency: u64,
    /// Whether to use parallel processing
    pub parallel: bool,
    /// Emit a progress line every this many merges (0 disables it)
    pub log_interval: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            vocab_size: 5000,
            min_frequency: 2,
            parallel: true,
            log_interval: 100,
        }
    }
}

impl TrainingConfig {
    /// Check the configuration before any training work is done.
    pub fn validate(&self) -> Result<()> {
        if self.vocab_size <= varna_core::BYTE_TOKENS {
            return Err(TokenizerError::InvalidVocabSize {
                requested: self.vocab_size,
            });
        }
        if self.min_frequency == 0 {
            return Err(TokenizerError::InvalidConfig(
                "min_frequency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// What a training run saw and produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSummary {
    /// Characters in the corpus
    pub corpus_chars: usize,
    /// UTF-8 bytes in the corpus
    pub corpus_bytes: usize,
    /// Distinct pre-segments
    pub distinct_segments: usize,
    /// Pre-segment occurrences
    pub total_segments: u64,
    /// Merge rules learned
    pub merges: usize,
    /// Tokens in the final vocabulary
    pub vocab_len: usize,
    /// Tokens the corpus occupies after all merges
    pub corpus_tokens: u64,
}

impl TrainingSummary {
    /// Bytes per token over the training corpus (0.0 for an empty corpus).
    pub fn compression_ratio(&self) -> f64 {
        if self.corpus_tokens == 0 {
            0.0
        } else {
            self.corpus_bytes as f64 / self.corpus_tokens as f64
        }
    }
}

/// BPE trainer.
///
/// Trains a byte-level BPE model from text data by iteratively merging the
/// most frequent token pairs. Equal counts are resolved in favour of the
/// lexicographically smallest `(left, right)` pair, so training is fully
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct BpeTrainer {
    /// Configuration
    config: TrainingConfig,
}

impl BpeTrainer {
    /// Create a new BPE trainer with the given configuration.
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Create a new BPE trainer with default configuration.
    pub fn with_vocab_size(vocab_size: usize) -> Self {
        Self::new(TrainingConfig {
            vocab_size,
            ..Default::default()
        })
    }

    /// Training configuration.
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train a model on a single text.
    pub fn train(&self, text: &str) -> Result<(Model, TrainingSummary)> {
        self.train_from_iter(std::iter::once(text))
    }

    /// Train a model on a sequence of documents.
    ///
    /// Each document is pre-segmented on its own; segment tallies are shared.
    pub fn train_from_iter<I, S>(&self, documents: I) -> Result<(Model, TrainingSummary)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.validate()?;
        let mut model = Model::new(self.config.vocab_size)?;

        let mut summary = TrainingSummary::default();
        let mut counter = PairCounter::new();
        for document in documents {
            let document = document.as_ref();
            summary.corpus_chars += document.chars().count();
            summary.corpus_bytes += document.len();
            counter.add_text(document);
        }
        summary.distinct_segments = counter.word_count();
        summary.total_segments = counter.total_word_occurrences();

        info!(
            chars = summary.corpus_chars,
            bytes = summary.corpus_bytes,
            distinct_segments = summary.distinct_segments,
            target = self.config.vocab_size,
            "Starting BPE training"
        );

        self.run_merges(&mut model, &mut counter);

        summary.merges = model.merges().len();
        summary.vocab_len = model.len();
        summary.corpus_tokens = counter.total_tokens();

        info!(
            merges = summary.merges,
            vocab = summary.vocab_len,
            ratio = summary.compression_ratio(),
            "Training complete"
        );

        Ok((model, summary))
    }

    /// Main training loop: iteratively merge most frequent pairs.
    fn run_merges(&self, model: &mut Model, counter: &mut PairCounter) {
        let mut pair_counts = if self.config.parallel {
            counter.count_pairs_parallel()
        } else {
            counter.count_pairs_sequential()
        };
        let mut queue = PairPriorityQueue::from_counts(&pair_counts);
        let mut banned: AHashSet<Pair> = AHashSet::new();

        while !model.is_full() {
            let Some(candidate) = queue.pop() else {
                break;
            };

            if candidate.count < self.config.min_frequency {
                break;
            }

            // A pair whose concatenation already exists would give one
            // surface two IDs.
            if model.merge_collides(candidate.pair) {
                debug!(pair = ?candidate.pair, "Skipping pair with an existing surface form");
                banned.insert(candidate.pair);
                continue;
            }

            let new_token_id = match model.add_merge(candidate.pair) {
                Ok(id) => id,
                Err(err) => {
                    warn!(pair = ?candidate.pair, %err, "Skipping unmergeable pair");
                    banned.insert(candidate.pair);
                    continue;
                }
            };
            let rank = model.merges().len() - 1;

            debug!(
                rank,
                pair = ?candidate.pair,
                id = new_token_id,
                count = candidate.count,
                "Merged pair"
            );
            if self.config.log_interval > 0
                && (rank < 10 || (rank + 1) % self.config.log_interval == 0)
            {
                info!(
                    merge = rank + 1,
                    vocab = model.len(),
                    count = candidate.count,
                    "Training progress"
                );
            }

            let deltas =
                counter.merge_pair_in_words(candidate.pair, new_token_id, self.config.parallel);
            update_pair_counts(&mut pair_counts, &mut queue, &banned, deltas);
        }

        if !model.is_full() {
            warn!(
                merges = model.merges().len(),
                target = self.config.vocab_size,
                min_frequency = self.config.min_frequency,
                "No pair reaches the minimum frequency, stopping early"
            );
        }
    }
}

/// Apply weighted count changes after a merge and refresh the queue.
fn update_pair_counts(
    pair_counts: &mut AHashMap<Pair, u64>,
    queue: &mut PairPriorityQueue,
    banned: &AHashSet<Pair>,
    deltas: AHashMap<Pair, i64>,
) {
    for (pair, delta) in deltas {
        let current = pair_counts.get(&pair).copied().unwrap_or(0);
        let new_count = (current as i64 + delta).max(0) as u64;

        if new_count > 0 {
            pair_counts.insert(pair, new_count);
        } else {
            pair_counts.remove(&pair);
        }

        if !banned.contains(&pair) {
            queue.update(pair, new_count);
        }
    }
}
