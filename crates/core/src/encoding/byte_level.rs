//! Byte-level BPE encoding.
//!
//! Text is pre-segmented exactly as during training. Each segment starts as
//! its raw UTF-8 bytes (token IDs 0..=255) and the lowest-ranked applicable
//! merge is applied repeatedly until none applies, which replays the
//! trainer's merge history for that segment.

use crate::core::merges::merge_in_place;
use crate::core::{Model, Pair};
use crate::pre_tokenizer::Splitter;
use crate::Result;
use std::sync::Arc;

/// Encode `text` with `model`, using the Hindi pre-segmentation.
pub fn encode(text: &str, model: &Model) -> Vec<u32> {
    let mut ids = Vec::with_capacity(text.len());
    for segment in Splitter::hindi().segments(text) {
        encode_segment_into(segment.as_bytes(), model, &mut ids);
    }
    ids
}

/// Concatenate the surface bytes of `ids`.
///
/// Fails with `UnknownToken` on the first ID missing from the model.
pub fn decode_bytes(ids: &[u32], model: &Model) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(ids.len() * 2);
    for &id in ids {
        bytes.extend_from_slice(model.token_bytes(id)?);
    }
    Ok(bytes)
}

/// Decode token IDs back to text.
///
/// Byte sequences that are not valid UTF-8 (never produced by `encode`) are
/// decoded lossily with U+FFFD.
pub fn decode(ids: &[u32], model: &Model) -> Result<String> {
    let bytes = decode_bytes(ids, model)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}

/// Apply the model's merges to one segment and append the result to `out`.
fn encode_segment_into(bytes: &[u8], model: &Model, out: &mut Vec<u32>) {
    let mut tokens: Vec<u32> = bytes.iter().map(|&b| b as u32).collect();
    let merges = model.merges();

    while tokens.len() >= 2 {
        let best = tokens
            .windows(2)
            .filter_map(|w| {
                let pair: Pair = (w[0], w[1]);
                merges.get(pair).map(|(rank, new_id)| (rank, pair, new_id))
            })
            .min_by_key(|&(rank, _, _)| rank);

        match best {
            Some((_, pair, new_id)) => {
                merge_in_place(&mut tokens, pair, new_id);
            }
            None => break,
        }
    }

    out.extend_from_slice(&tokens);
}

/// Byte-level BPE encoder over a shared, read-only model.
///
/// Cloning is cheap and clones share the model, so an encoder can be handed
/// to any number of threads.
#[derive(Debug, Clone)]
pub struct ByteLevelEncoder {
    /// Trained model
    model: Arc<Model>,
    /// Pre-segmentation
    splitter: Splitter,
}

impl ByteLevelEncoder {
    /// Create a new byte-level encoder with Hindi pre-segmentation.
    pub fn new(model: Arc<Model>) -> Self {
        Self {
            model,
            splitter: Splitter::hindi(),
        }
    }

    /// The shared model.
    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    /// Encode text into token IDs. Never fails: unseen bytes fall back to
    /// the single-byte tokens.
    pub fn encode(&self, text: &str) -> Vec<u32> {
        let mut ids = Vec::with_capacity(text.len());
        for segment in self.splitter.segments(text) {
            encode_segment_into(segment.as_bytes(), &self.model, &mut ids);
        }
        ids
    }

    /// Decode token IDs back to text.
    pub fn decode(&self, ids: &[u32]) -> Result<String> {
        decode(ids, &self.model)
    }

    /// Decode token IDs to raw bytes.
    pub fn decode_bytes(&self, ids: &[u32]) -> Result<Vec<u8>> {
        decode_bytes(ids, &self.model)
    }
}
