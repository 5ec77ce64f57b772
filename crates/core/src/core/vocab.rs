//! Vocabulary storage and lookup.
//!
//! The vocabulary is an append-only arena of surface byte strings indexed by
//! token ID, plus a hash index from surface bytes back to the ID. Tokens are
//! never removed or renumbered, so the two directions stay consistent.

use crate::error::{Result, TokenizerError};
use ahash::AHashMap;
use std::sync::Arc;

/// Number of single-byte base tokens.
pub const BYTE_TOKENS: usize = 256;

/// Reverse mapping: surface bytes -> ID
pub type VocabR = AHashMap<Arc<[u8]>, u32>;

/// Byte-level vocabulary with forward and reverse mappings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    /// Arena: ID -> surface bytes
    entries: Vec<Arc<[u8]>>,
    /// Reverse index: surface bytes -> ID
    index: VocabR,
}

impl Vocabulary {
    /// Create a vocabulary holding the 256 single-byte tokens.
    pub fn new() -> Self {
        Self::with_capacity(BYTE_TOKENS)
    }

    /// Create a byte vocabulary with room for `capacity` tokens in total.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(BYTE_TOKENS);
        let mut vocab = Self {
            entries: Vec::with_capacity(capacity),
            index: VocabR::with_capacity(capacity),
        };
        for byte in 0..=u8::MAX {
            vocab.append(Arc::from(vec![byte]));
        }
        vocab
    }

    fn append(&mut self, bytes: Arc<[u8]>) -> u32 {
        let id = self.entries.len() as u32;
        self.index.insert(bytes.clone(), id);
        self.entries.push(bytes);
        id
    }

    /// Add the token formed by concatenating `left` and `right`.
    ///
    /// Returns the ID assigned to the new token. Fails if either parent is
    /// unknown or the concatenation already exists in the vocabulary.
    pub fn add_merged(&mut self, left: u32, right: u32) -> Result<u32> {
        let bytes = self.concat(left, right)?;

        if let Some(&existing) = self.index.get(bytes.as_slice()) {
            return Err(TokenizerError::MalformedModel(format!(
                "merge ({left}, {right}) produces a surface form already held by token {existing}"
            )));
        }

        Ok(self.append(Arc::from(bytes)))
    }

    /// Surface bytes of `left` followed by those of `right`.
    pub fn concat(&self, left: u32, right: u32) -> Result<Vec<u8>> {
        let left_bytes = self.get_bytes(left).ok_or(TokenizerError::UnknownToken(left))?;
        let right_bytes = self
            .get_bytes(right)
            .ok_or(TokenizerError::UnknownToken(right))?;

        let mut bytes = Vec::with_capacity(left_bytes.len() + right_bytes.len());
        bytes.extend_from_slice(left_bytes);
        bytes.extend_from_slice(right_bytes);
        Ok(bytes)
    }

    /// Get the ID for a surface byte string.
    #[inline]
    pub fn get_id(&self, bytes: &[u8]) -> Option<u32> {
        self.index.get(bytes).copied()
    }

    /// Get the surface bytes for an ID.
    #[inline]
    pub fn get_bytes(&self, id: u32) -> Option<&[u8]> {
        self.entries.get(id as usize).map(|b| b.as_ref())
    }

    /// Iterate over `(id, surface bytes)` in ID order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (u32, &[u8])> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(id, bytes)| (id as u32, bytes.as_ref()))
    }

    /// Get the size of the vocabulary.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the byte tokens are present from construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}
