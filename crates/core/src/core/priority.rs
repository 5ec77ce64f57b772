//! Priority queue for BPE merge candidates.
//!
//! This module provides the max-heap the trainer pops merge candidates from.
//! Counts are updated lazily: every update pushes a fresh entry and older
//! entries for the same pair are discarded as stale when popped.

use crate::core::merges::Pair;
use ahash::AHashMap;
use dary_heap::OctonaryHeap;

/// A merge candidate during BPE training.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCandidate {
    /// The pair of token IDs to merge
    pub pair: Pair,
    /// The weighted frequency of this pair
    pub count: u64,
}

impl MergeCandidate {
    /// Create a new merge candidate.
    pub fn new(pair: Pair, count: u64) -> Self {
        Self { pair, count }
    }
}

// Higher count wins; equal counts prefer the lexicographically smaller pair.
impl Ord for MergeCandidate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.count
            .cmp(&other.count)
            .then_with(|| other.pair.cmp(&self.pair))
    }
}

impl PartialOrd for MergeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue for BPE merge operations.
///
/// Uses an 8-ary heap for better cache locality than a binary heap.
pub struct PairPriorityQueue {
    /// The heap storing merge candidates
    heap: OctonaryHeap<MergeCandidate>,
    /// Track current counts to detect stale entries
    current_counts: AHashMap<Pair, u64>,
}

impl PairPriorityQueue {
    /// Create a new priority queue with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: OctonaryHeap::with_capacity(capacity),
            current_counts: AHashMap::with_capacity(capacity),
        }
    }

    /// Create a new empty priority queue.
    pub fn new() -> Self {
        Self {
            heap: OctonaryHeap::new(),
            current_counts: AHashMap::new(),
        }
    }

    /// Build a queue from a full pair tally.
    pub fn from_counts<'a>(counts: impl IntoIterator<Item = (&'a Pair, &'a u64)>) -> Self {
        let iter = counts.into_iter();
        let mut queue = Self::with_capacity(iter.size_hint().0);
        for (&pair, &count) in iter {
            queue.update(pair, count);
        }
        queue
    }

    /// Push a merge candidate onto the queue.
    pub fn push(&mut self, candidate: MergeCandidate) {
        self.update(candidate.pair, candidate.count);
    }

    /// Pop the highest priority merge candidate.
    ///
    /// Returns None if the queue is empty or only contains stale entries.
    pub fn pop(&mut self) -> Option<MergeCandidate> {
        while let Some(candidate) = self.heap.pop() {
            if let Some(&current) = self.current_counts.get(&candidate.pair) {
                if current == candidate.count {
                    self.current_counts.remove(&candidate.pair);
                    return Some(candidate);
                }
            }
        }
        None
    }

    /// Set the count for a pair.
    ///
    /// Older entries for the pair become stale. A count of zero removes the
    /// pair from the queue entirely.
    pub fn update(&mut self, pair: Pair, new_count: u64) {
        if new_count == 0 {
            self.current_counts.remove(&pair);
            return;
        }
        self.current_counts.insert(pair, new_count);
        self.heap.push(MergeCandidate::new(pair, new_count));
    }

    /// Get the number of (potentially stale) entries in the queue.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Clear all entries from the queue.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.current_counts.clear();
    }

    /// Get the current count for a pair.
    pub fn get_count(&self, pair: Pair) -> Option<u64> {
        self.current_counts.get(&pair).copied()
    }
}

impl Default for PairPriorityQueue {
    fn default() -> Self {
        Self::new()
    }
}
