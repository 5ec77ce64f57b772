//! Merge rule management for BPE.
//!
//! Merge rules are stored using token IDs rather than byte strings for fast
//! comparison. The rule list is kept in rank order; a hash index maps each
//! pair back to its rank and result token for encoding.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A pair of token IDs that can be merged.
pub type Pair = (u32, u32);

/// Merge lookup: pair -> (rank, new_token_id).
///
/// The rank indicates the priority of this merge rule (lower rank = higher priority).
/// The new_token_id is the ID of the token created by merging this pair.
pub type MergeMap = AHashMap<Pair, (u32, u32)>;

/// A single learned merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRule {
    /// The adjacent token pair this rule replaces
    pub pair: Pair,
    /// Token created by the merge
    pub result: u32,
    /// Position in training order
    pub rank: u32,
}

/// Ordered collection of BPE merge rules with pair lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeRules {
    /// Rules in rank order; `rules[i].rank == i`
    rules: Vec<MergeRule>,
    /// Pair -> (rank, new_token_id)
    lookup: MergeMap,
}

impl MergeRules {
    /// Create a new empty collection of merge rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new collection with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rules: Vec::with_capacity(capacity),
            lookup: MergeMap::with_capacity(capacity),
        }
    }

    /// Append a merge rule at the next rank and return that rank.
    ///
    /// Returns `None` if the pair already has a rule; the collection is left
    /// unchanged in that case.
    pub fn push(&mut self, pair: Pair, result: u32) -> Option<u32> {
        if self.lookup.contains_key(&pair) {
            return None;
        }
        let rank = self.rules.len() as u32;
        self.rules.push(MergeRule { pair, result, rank });
        self.lookup.insert(pair, (rank, result));
        Some(rank)
    }

    /// Get the merge rule for a pair.
    ///
    /// Returns Some((rank, new_token_id)) if this pair should be merged,
    /// None otherwise.
    #[inline]
    pub fn get(&self, pair: Pair) -> Option<(u32, u32)> {
        self.lookup.get(&pair).copied()
    }

    /// Rules in rank order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &MergeRule> + '_ {
        self.rules.iter()
    }

    /// Rules as a slice in rank order.
    pub fn as_slice(&self) -> &[MergeRule] {
        &self.rules
    }

    /// Get the number of merge rules.
    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no merge rules.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Replace every non-overlapping left-to-right occurrence of `pair` in
/// `tokens` with `new_id`. Returns the number of replacements.
pub fn merge_in_place(tokens: &mut Vec<u32>, pair: Pair, new_id: u32) -> usize {
    let mut read = 0;
    let mut write = 0;
    let mut merged = 0;

    while read < tokens.len() {
        if read + 1 < tokens.len() && tokens[read] == pair.0 && tokens[read + 1] == pair.1 {
            tokens[write] = new_id;
            read += 2;
            merged += 1;
        } else {
            tokens[write] = tokens[read];
            read += 1;
        }
        write += 1;
    }

    tokens.truncate(write);
    merged
}

/// Statistics about merge rules.
#[derive(Debug, Clone, Default)]
pub struct MergeStats {
    /// Number of merge rules
    pub count: usize,
    /// Highest token ID produced by a merge
    pub max_result: u32,
    /// Longest chain of merges needed to build any single token
    pub max_depth: usize,
}

impl MergeRules {
    /// Get statistics about the merge rules.
    pub fn stats(&self) -> MergeStats {
        let mut depth: AHashMap<u32, usize> = AHashMap::with_capacity(self.rules.len());
        let mut max_depth = 0;

        for rule in &self.rules {
            let left = depth.get(&rule.pair.0).copied().unwrap_or(0);
            let right = depth.get(&rule.pair.1).copied().unwrap_or(0);
            let d = left.max(right) + 1;
            depth.insert(rule.result, d);
            max_depth = max_depth.max(d);
        }

        MergeStats {
            count: self.len(),
            max_result: self.rules.last().map_or(0, |r| r.result),
            max_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_contiguous_ranks() {
        let mut rules = MergeRules::new();
        assert_eq!(rules.push((0, 1), 256), Some(0));
        assert_eq!(rules.push((1, 2), 257), Some(1));

        assert_eq!(rules.get((0, 1)), Some((0, 256)));
        assert_eq!(rules.get((1, 2)), Some((1, 257)));
        assert_eq!(rules.get((2, 3)), None);

        let ranks: Vec<u32> = rules.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![0, 1]);
    }

    #[test]
    fn test_push_rejects_duplicate_pair() {
        let mut rules = MergeRules::new();
        rules.push((0, 1), 256);
        assert_eq!(rules.push((0, 1), 257), None);
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_merge_in_place_is_non_overlapping() {
        let mut tokens = vec![1, 1, 1, 2, 1, 1];
        let merged = merge_in_place(&mut tokens, (1, 1), 9);
        assert_eq!(merged, 2);
        assert_eq!(tokens, vec![9, 1, 2, 9]);

        let mut tokens = vec![1, 1, 1, 1];
        merge_in_place(&mut tokens, (1, 1), 9);
        assert_eq!(tokens, vec![9, 9]);
    }

    #[test]
    fn test_stats() {
        let mut rules = MergeRules::new();
        rules.push((97, 98), 256);
        rules.push((256, 99), 257);
        rules.push((120, 121), 258);

        let stats = rules.stats();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.max_result, 258);
        assert_eq!(stats.max_depth, 2);
    }
}
