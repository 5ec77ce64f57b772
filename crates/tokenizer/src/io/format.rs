//! Format definitions for tokenizer serialization.
//!
//! A model is stored as one JSON document. Token surfaces are written as byte
//! arrays because merged tokens may end in the middle of a UTF-8 sequence.

use serde::{Deserialize, Serialize};
use varna_core::{MergeRule, Model, HINDI_PATTERN};

/// File name used when a model directory is given instead of a file.
pub const MODEL_FILE: &str = "tokenizer.json";

/// One entry of the token table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedToken {
    /// Token ID
    pub id: u32,
    /// Surface form as raw bytes
    pub bytes: Vec<u8>,
}

/// Merge rule for serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedMerge {
    /// The pair of token IDs being merged
    pub pair: [u32; 2],
    /// The new token ID created by this merge
    pub result: u32,
    /// The rank/priority of this merge
    pub rank: u32,
}

/// Complete model serialization format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedModel {
    /// Crate version that wrote the file
    pub version: String,
    /// Target vocabulary size
    pub vocab_size: usize,
    /// Pre-segmentation pattern the model was trained with
    pub pattern: String,
    /// Token table in ID order
    pub vocab: Vec<SerializedToken>,
    /// Merge rules in rank order
    pub merges: Vec<SerializedMerge>,
}

impl From<&Model> for SerializedModel {
    fn from(model: &Model) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            vocab_size: model.vocab_size(),
            pattern: HINDI_PATTERN.to_string(),
            vocab: model
                .vocab()
                .iter()
                .map(|(id, bytes)| SerializedToken {
                    id,
                    bytes: bytes.to_vec(),
                })
                .collect(),
            merges: model
                .merges()
                .iter()
                .map(|rule| SerializedMerge {
                    pair: [rule.pair.0, rule.pair.1],
                    result: rule.result,
                    rank: rule.rank,
                })
                .collect(),
        }
    }
}

impl From<SerializedMerge> for MergeRule {
    fn from(merge: SerializedMerge) -> Self {
        MergeRule {
            pair: (merge.pair[0], merge.pair[1]),
            result: merge.result,
            rank: merge.rank,
        }
    }
}
