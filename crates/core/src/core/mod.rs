//! Core BPE data structures.
//!
//! Token table, merge rules, the model that ties them together, and the
//! priority queue used to pick merges during training.

pub mod merges;
pub mod model;
pub mod priority;
pub mod vocab;

pub use merges::{merge_in_place, MergeMap, MergeRule, MergeRules, MergeStats, Pair};
pub use model::Model;
pub use priority::{MergeCandidate, PairPriorityQueue};
pub use vocab::{Vocabulary, BYTE_TOKENS};
