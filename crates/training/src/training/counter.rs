//! Pair counting for BPE training.
//!
//! Identical pre-segments are collapsed into one entry with an occurrence
//! count, so pair tallies scale with the number of distinct segments rather
//! than with corpus length. An inverted index from pair to the segments that
//! contain it keeps each merge's rewrite limited to the affected segments.

use ahash::{AHashMap, AHashSet};
use rayon::prelude::*;
use varna_core::{merge_in_place, Pair, Splitter};

/// Candidate count above which a rewrite is spread across the rayon pool.
const PARALLEL_REWRITE_THRESHOLD: usize = 512;

/// Counter for BPE pair frequencies.
pub struct PairCounter {
    /// Segment -> tokenized representation (as token IDs)
    words: Vec<Vec<u32>>,
    /// Segment -> occurrence count in the corpus
    word_counts: Vec<u64>,
    /// Segment text -> index into `words`
    seen: AHashMap<String, usize>,
    /// Pair -> segments that may contain it
    pair_words: AHashMap<Pair, AHashSet<usize>>,
    /// Pre-segmentation applied to added text
    splitter: Splitter,
}

impl PairCounter {
    /// Create a new pair counter using Hindi pre-segmentation.
    pub fn new() -> Self {
        Self {
            words: Vec::new(),
            word_counts: Vec::new(),
            seen: AHashMap::new(),
            pair_words: AHashMap::new(),
            splitter: Splitter::hindi(),
        }
    }

    /// Pre-segment `text` and add every segment.
    pub fn add_text(&mut self, text: &str) {
        for segment in self.splitter.segments(text) {
            self.add_segment(segment);
        }
    }

    /// Add a single pre-segment to the counter.
    pub fn add_segment(&mut self, segment: &str) {
        if segment.is_empty() {
            return;
        }

        if let Some(&idx) = self.seen.get(segment) {
            self.word_counts[idx] += 1;
            return;
        }

        let idx = self.words.len();
        let tokens: Vec<u32> = segment.bytes().map(u32::from).collect();
        for window in tokens.windows(2) {
            self.pair_words
                .entry((window[0], window[1]))
                .or_default()
                .insert(idx);
        }

        self.seen.insert(segment.to_string(), idx);
        self.words.push(tokens);
        self.word_counts.push(1);
    }

    /// Count all pairs in parallel.
    ///
    /// This returns a map of pair -> frequency count across all segments,
    /// each segment weighted by its occurrence count.
    pub fn count_pairs_parallel(&self) -> AHashMap<Pair, u64> {
        self.words
            .par_iter()
            .zip(self.word_counts.par_iter())
            .map(|(word, &count)| {
                let mut pair_counts: AHashMap<Pair, u64> = AHashMap::new();

                for window in word.windows(2) {
                    let pair = (window[0], window[1]);
                    *pair_counts.entry(pair).or_insert(0) += count;
                }

                pair_counts
            })
            .reduce(AHashMap::new, |mut acc, pair_counts| {
                for (pair, count) in pair_counts {
                    *acc.entry(pair).or_insert(0) += count;
                }
                acc
            })
    }

    /// Count all pairs sequentially (for debugging or single-threaded use).
    pub fn count_pairs_sequential(&self) -> AHashMap<Pair, u64> {
        let mut pair_counts: AHashMap<Pair, u64> = AHashMap::new();

        for (word, &count) in self.words.iter().zip(self.word_counts.iter()) {
            for window in word.windows(2) {
                let pair = (window[0], window[1]);
                *pair_counts.entry(pair).or_insert(0) += count;
            }
        }

        pair_counts
    }

    /// Get the number of distinct segments.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Get the total count of all segment occurrences.
    pub fn total_word_occurrences(&self) -> u64 {
        self.word_counts.iter().sum()
    }

    /// Number of tokens the whole corpus currently occupies.
    pub fn total_tokens(&self) -> u64 {
        self.words
            .iter()
            .zip(self.word_counts.iter())
            .map(|(word, &count)| word.len() as u64 * count)
            .sum()
    }

    /// Get a reference to the segments.
    pub fn words(&self) -> &[Vec<u32>] {
        &self.words
    }

    /// Get a reference to the segment counts.
    pub fn word_counts(&self) -> &[u64] {
        &self.word_counts
    }

    /// Clear all data from the counter.
    pub fn clear(&mut self) {
        self.words.clear();
        self.word_counts.clear();
        self.seen.clear();
        self.pair_words.clear();
    }

    /// Merge a pair in all segments (mutates segments in place).
    ///
    /// Returns the net change of every affected pair's weighted count. The
    /// merged pair itself always ends at zero.
    pub fn merge_pair_in_words(
        &mut self,
        pair: Pair,
        new_token_id: u32,
        parallel: bool,
    ) -> AHashMap<Pair, i64> {
        let Some(candidates) = self.pair_words.remove(&pair) else {
            return AHashMap::new();
        };

        let changes: Vec<(usize, AHashMap<Pair, i64>)> =
            if parallel && candidates.len() >= PARALLEL_REWRITE_THRESHOLD {
                let mut marked = vec![false; self.words.len()];
                for &idx in &candidates {
                    marked[idx] = true;
                }
                self.words
                    .par_iter_mut()
                    .zip(self.word_counts.par_iter())
                    .enumerate()
                    .filter(|(idx, _)| marked[*idx])
                    .filter_map(|(idx, (word, &count))| {
                        merge_word(word, count, pair, new_token_id).map(|delta| (idx, delta))
                    })
                    .collect()
            } else {
                let mut indices: Vec<usize> = candidates.into_iter().collect();
                indices.sort_unstable();
                indices
                    .into_iter()
                    .filter_map(|idx| {
                        merge_word(&mut self.words[idx], self.word_counts[idx], pair, new_token_id)
                            .map(|delta| (idx, delta))
                    })
                    .collect()
            };

        let mut aggregated: AHashMap<Pair, i64> = AHashMap::new();
        for (idx, delta) in changes {
            for (changed, amount) in delta {
                if amount > 0 {
                    self.pair_words.entry(changed).or_default().insert(idx);
                }
                *aggregated.entry(changed).or_insert(0) += amount;
            }
        }
        aggregated.retain(|_, amount| *amount != 0);
        aggregated
    }
}

/// Rewrite one segment and return its weighted net pair-count changes, or
/// `None` if the segment does not contain `pair`.
fn merge_word(
    word: &mut Vec<u32>,
    count: u64,
    pair: Pair,
    new_token_id: u32,
) -> Option<AHashMap<Pair, i64>> {
    if !word.windows(2).any(|w| (w[0], w[1]) == pair) {
        return None;
    }

    let weight = count as i64;
    let mut delta: AHashMap<Pair, i64> = AHashMap::new();
    for window in word.windows(2) {
        *delta.entry((window[0], window[1])).or_insert(0) -= weight;
    }

    merge_in_place(word, pair, new_token_id);

    for window in word.windows(2) {
        *delta.entry((window[0], window[1])).or_insert(0) += weight;
    }

    delta.retain(|_, amount| *amount != 0);
    Some(delta)
}

impl Default for PairCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_segment_collapses_duplicates() {
        let mut counter = PairCounter::new();
        counter.add_text("ab ab ab");

        // "ab" once, " ab" twice
        assert_eq!(counter.word_count(), 2);
        assert_eq!(counter.word_counts(), &[1, 2]);
        assert_eq!(counter.words()[0].as_slice(), &[97, 98]);
        assert_eq!(counter.total_word_occurrences(), 3);
    }

    #[test]
    fn test_count_pairs_sequential() {
        let mut counter = PairCounter::new();
        counter.add_segment("ab");
        counter.add_segment("bc");

        let pairs = counter.count_pairs_sequential();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs.get(&(97, 98)), Some(&1));
        assert_eq!(pairs.get(&(98, 99)), Some(&1));
    }

    #[test]
    fn test_count_pairs_with_frequency() {
        let mut counter = PairCounter::new();
        counter.add_segment("ab");
        counter.add_segment("ab");
        counter.add_segment("ab");

        let pairs = counter.count_pairs_sequential();
        assert_eq!(pairs.get(&(97, 98)), Some(&3));
    }

    #[test]
    fn test_count_pairs_parallel_matches_sequential() {
        let mut counter = PairCounter::new();
        counter.add_text("का का का कि कि abc bcd cde");

        assert_eq!(
            counter.count_pairs_parallel(),
            counter.count_pairs_sequential()
        );
        // E0 A4 starts every Devanagari character: 2 per word, 5 words
        assert_eq!(counter.count_pairs_parallel().get(&(0xE0, 0xA4)), Some(&10));
    }

    #[test]
    fn test_merge_pair_deltas_match_recount() {
        for parallel in [false, true] {
            let mut counter = PairCounter::new();
            counter.add_text("aaab aab aaab xaa");

            let before = counter.count_pairs_sequential();
            let deltas = counter.merge_pair_in_words((97, 97), 256, parallel);
            let after = counter.count_pairs_sequential();

            let mut expected = before.clone();
            for (pair, delta) in &deltas {
                let entry = expected.entry(*pair).or_insert(0);
                *entry = (*entry as i64 + delta) as u64;
            }
            expected.retain(|_, count| *count > 0);

            assert_eq!(expected, after);
            assert!(!after.contains_key(&(97, 97)));
        }
    }

    /// One distinct " <consonant><consonant><vowel sign>" segment per index.
    fn wide_corpus(segments: usize) -> String {
        (0..segments)
            .map(|i| {
                let first = char::from_u32(0x0915 + (i % 37) as u32).unwrap();
                let second = char::from_u32(0x0915 + (i / 37 % 37) as u32).unwrap();
                let sign = char::from_u32(0x093E + (i % 13) as u32).unwrap();
                format!(" {first}{second}{sign}")
            })
            .collect()
    }

    #[test]
    fn test_parallel_rewrite_matches_sequential() {
        let corpus = wide_corpus(1200);
        let mut sequential = PairCounter::new();
        let mut parallel = PairCounter::new();
        sequential.add_text(&corpus);
        parallel.add_text(&corpus);
        assert!(sequential.word_count() > PARALLEL_REWRITE_THRESHOLD);

        // Both pairs occur in every segment, so both rewrites take the rayon path.
        for (pair, new_id) in [((0xE0, 0xA4), 256), ((0x20, 256), 257)] {
            let expected = sequential.merge_pair_in_words(pair, new_id, false);
            let actual = parallel.merge_pair_in_words(pair, new_id, true);

            assert!(!expected.is_empty());
            assert_eq!(actual, expected);
            assert_eq!(parallel.words(), sequential.words());
        }

        assert_eq!(
            parallel.count_pairs_parallel(),
            sequential.count_pairs_sequential()
        );
        assert_eq!(parallel.total_tokens(), sequential.total_tokens());
    }

    #[test]
    fn test_merge_unknown_pair_is_noop() {
        let mut counter = PairCounter::new();
        counter.add_text("abc");
        assert!(counter.merge_pair_in_words((1, 2), 256, false).is_empty());
        assert_eq!(counter.total_tokens(), 3);
    }
}
