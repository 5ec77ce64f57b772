//! The trained BPE model: token table, ordered merge rules and target size.
//!
//! A `Model` is only ever built by appending merges one at a time (training)
//! or by replaying a persisted rule list through the same path (loading), so
//! every invariant of the token table is checked at construction.

use crate::core::merges::{MergeRule, MergeRules, Pair};
use crate::core::vocab::{Vocabulary, BYTE_TOKENS};
use crate::error::{Result, TokenizerError};

// Upper bound on up-front allocation for very large requested sizes.
const PREALLOC_LIMIT: usize = 1 << 16;

/// Trained byte-level BPE model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    /// Requested vocabulary size
    vocab_size: usize,
    /// Token table
    vocab: Vocabulary,
    /// Merge rules in rank order
    merges: MergeRules,
}

impl Model {
    /// Create a model with only the 256 byte tokens.
    ///
    /// Fails with `InvalidVocabSize` when `vocab_size` leaves no room for a merge.
    pub fn new(vocab_size: usize) -> Result<Self> {
        if vocab_size <= BYTE_TOKENS {
            return Err(TokenizerError::InvalidVocabSize {
                requested: vocab_size,
            });
        }

        Ok(Self {
            vocab_size,
            vocab: Vocabulary::with_capacity(vocab_size.min(PREALLOC_LIMIT)),
            merges: MergeRules::with_capacity((vocab_size - BYTE_TOKENS).min(PREALLOC_LIMIT)),
        })
    }

    /// Rebuild a model from persisted parts, validating every invariant.
    ///
    /// `tokens` is the id -> surface table in any order. `merges` must be in
    /// rank order. Any inconsistency is reported as `MalformedModel`.
    pub fn from_parts(
        vocab_size: usize,
        tokens: impl IntoIterator<Item = (u32, Vec<u8>)>,
        merges: impl IntoIterator<Item = MergeRule>,
    ) -> Result<Self> {
        let mut model = Self::new(vocab_size).map_err(|_| {
            TokenizerError::malformed(format!(
                "vocab_size {vocab_size} must be greater than {BYTE_TOKENS}"
            ))
        })?;

        let mut tokens: Vec<(u32, Vec<u8>)> = tokens.into_iter().collect();
        tokens.sort_by_key(|(id, _)| *id);

        for (expected, (id, _)) in tokens.iter().enumerate() {
            let expected = expected as u32;
            if *id < expected {
                return Err(TokenizerError::malformed(format!("duplicate token id {id}")));
            }
            if *id > expected {
                return Err(TokenizerError::malformed(format!(
                    "token ids are not contiguous: id {expected} is missing"
                )));
            }
        }

        for (id, bytes) in tokens.iter().take(BYTE_TOKENS) {
            if bytes.as_slice() != [*id as u8] {
                return Err(TokenizerError::malformed(format!(
                    "byte token {id} must have surface [{id}], found {bytes:?}"
                )));
            }
        }
        if tokens.len() < BYTE_TOKENS {
            return Err(TokenizerError::malformed(format!(
                "token table has {} entries, the 256 byte tokens are required",
                tokens.len()
            )));
        }

        for (position, rule) in merges.into_iter().enumerate() {
            if rule.rank as usize != position {
                return Err(TokenizerError::malformed(format!(
                    "merge rule at position {position} has rank {}",
                    rule.rank
                )));
            }

            let expected_id = (BYTE_TOKENS + position) as u32;
            if rule.result != expected_id {
                return Err(TokenizerError::malformed(format!(
                    "merge rule {position} produces id {}, expected {expected_id}",
                    rule.result
                )));
            }

            let id = model.add_merge(rule.pair).map_err(|err| match err {
                TokenizerError::UnknownToken(missing) => TokenizerError::malformed(format!(
                    "merge rule {position} references unknown token {missing}"
                )),
                other => other,
            })?;

            let surface = model.vocab.get_bytes(id).unwrap_or_default();
            match tokens.get(id as usize) {
                Some((_, bytes)) if bytes.as_slice() == surface => {}
                Some(_) => {
                    return Err(TokenizerError::malformed(format!(
                        "token {id} surface does not match merge of {:?}",
                        rule.pair
                    )))
                }
                None => {
                    return Err(TokenizerError::malformed(format!(
                        "merge rule {position} produces token {id} missing from the token table"
                    )))
                }
            }
        }

        if tokens.len() != model.vocab.len() {
            return Err(TokenizerError::malformed(format!(
                "token table has {} entries but the merge rules define {}",
                tokens.len(),
                model.vocab.len()
            )));
        }
        if model.vocab.len() > model.vocab_size {
            return Err(TokenizerError::malformed(format!(
                "{} tokens exceed the target vocabulary size {}",
                model.vocab.len(),
                model.vocab_size
            )));
        }

        Ok(model)
    }

    /// Append a merge of `pair`, returning the new token's ID.
    ///
    /// The new ID is the next free one, so it is greater than both parents.
    pub fn add_merge(&mut self, pair: Pair) -> Result<u32> {
        if self.merges.get(pair).is_some() {
            return Err(TokenizerError::malformed(format!(
                "duplicate merge rule for pair {pair:?}"
            )));
        }
        let id = self.vocab.add_merged(pair.0, pair.1)?;
        self.merges.push(pair, id);
        Ok(id)
    }

    /// Whether merging `pair` would produce a surface form already in the table.
    pub fn merge_collides(&self, pair: Pair) -> bool {
        self.vocab
            .concat(pair.0, pair.1)
            .map(|bytes| self.vocab.get_id(&bytes).is_some())
            .unwrap_or(false)
    }

    /// Requested vocabulary size.
    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// Number of tokens actually in the table.
    pub fn len(&self) -> usize {
        self.vocab.len()
    }

    /// Always false: the byte tokens are always present.
    pub fn is_empty(&self) -> bool {
        self.vocab.is_empty()
    }

    /// Whether the table already holds `vocab_size` tokens.
    pub fn is_full(&self) -> bool {
        self.vocab.len() >= self.vocab_size
    }

    /// Token table.
    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Merge rules in rank order.
    pub fn merges(&self) -> &MergeRules {
        &self.merges
    }

    /// Surface bytes of a token.
    #[inline]
    pub fn token_bytes(&self, id: u32) -> Result<&[u8]> {
        self.vocab
            .get_bytes(id)
            .ok_or(TokenizerError::UnknownToken(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn byte_table() -> Vec<(u32, Vec<u8>)> {
        (0..=255u8).map(|b| (b as u32, vec![b])).collect()
    }

    fn trained() -> Model {
        let mut model = Model::new(300).unwrap();
        model.add_merge((b'a' as u32, b'b' as u32)).unwrap();
        model.add_merge((256, b'c' as u32)).unwrap();
        model
    }

    fn parts(model: &Model) -> (Vec<(u32, Vec<u8>)>, Vec<MergeRule>) {
        let tokens = model
            .vocab()
            .iter()
            .map(|(id, bytes)| (id, bytes.to_vec()))
            .collect();
        let merges = model.merges().iter().copied().collect();
        (tokens, merges)
    }

    #[test]
    fn test_new_rejects_small_vocab() {
        assert!(matches!(
            Model::new(256),
            Err(TokenizerError::InvalidVocabSize { requested: 256 })
        ));
        assert!(Model::new(257).is_ok());
    }

    #[test]
    fn test_add_merge_assigns_increasing_ids() {
        let model = trained();
        assert_eq!(model.len(), 258);
        assert_eq!(model.token_bytes(257).unwrap(), b"abc");

        let rule = model.merges().as_slice()[1];
        assert_eq!(rule.rank, 1);
        assert!(rule.result > rule.pair.0 && rule.result > rule.pair.1);
    }

    #[test]
    fn test_merge_collides() {
        let mut model = trained();
        let bc = model.add_merge((b'b' as u32, b'c' as u32)).unwrap();
        assert!(model.merge_collides((b'a' as u32, bc)));
        assert!(!model.merge_collides((b'x' as u32, bc)));
    }

    #[test]
    fn test_from_parts_roundtrip() {
        let model = trained();
        let (mut tokens, merges) = parts(&model);
        tokens.reverse();

        let rebuilt = Model::from_parts(300, tokens, merges).unwrap();
        assert_eq!(rebuilt, model);
    }

    #[test]
    fn test_from_parts_duplicate_id() {
        let mut tokens = byte_table();
        tokens.push((10, vec![10]));
        let err = Model::from_parts(300, tokens, Vec::new()).unwrap_err();
        assert!(err.to_string().contains("duplicate token id 10"));
    }

    #[test]
    fn test_from_parts_dangling_reference() {
        let mut tokens = byte_table();
        tokens.push((256, b"ab".to_vec()));
        let merges = vec![MergeRule {
            pair: (b'a' as u32, 999),
            result: 256,
            rank: 0,
        }];
        let err = Model::from_parts(300, tokens, merges).unwrap_err();
        assert!(err.to_string().contains("unknown token 999"));
    }

    #[test]
    fn test_from_parts_ranks_out_of_order() {
        let model = trained();
        let (tokens, mut merges) = parts(&model);
        merges.swap(0, 1);
        let err = Model::from_parts(300, tokens, merges).unwrap_err();
        assert!(matches!(err, TokenizerError::MalformedModel(_)));
    }

    #[test]
    fn test_from_parts_surface_mismatch() {
        let model = trained();
        let (mut tokens, merges) = parts(&model);
        tokens[257].1 = b"xyz".to_vec();
        let err = Model::from_parts(300, tokens, merges).unwrap_err();
        assert!(err.to_string().contains("surface does not match"));
    }

    #[test]
    fn test_from_parts_extra_tokens() {
        let model = trained();
        let (mut tokens, merges) = parts(&model);
        tokens.push((258, b"zz".to_vec()));
        let err = Model::from_parts(300, tokens, merges).unwrap_err();
        assert!(err.to_string().contains("merge rules define 258"));
    }

    #[test]
    fn test_from_parts_exceeds_target() {
        let model = trained();
        let (tokens, merges) = parts(&model);
        let err = Model::from_parts(257, tokens, merges).unwrap_err();
        assert!(err.to_string().contains("exceed the target"));
    }
}
