//! Varna-core - Core byte-level BPE implementation for Hindi text
//!
//! This crate provides the fundamental data structures and algorithms for
//! byte-pair encoding (BPE) over UTF-8 bytes with Devanagari-aware
//! pre-segmentation.
//!
//! # Features
//!
//! - Append-only token table with `AHashMap` reverse index
//! - Rank-ordered merge rules with fast pair lookup
//! - Eagerly validated `Model` (token table + merge rules)
//! - Lossless Hindi pre-segmentation
//! - Byte-level encoder/decoder that never fails on novel input
//!
//! # Example
//!
//! ```rust
//! use varna_core::{decode, encode, Model};
//!
//! let mut model = Model::new(300)?;
//! model.add_merge((0xE0, 0xA4))?;
//!
//! let ids = encode("नमस्ते", &model);
//! assert_eq!(decode(&ids, &model)?, "नमस्ते");
//! # Ok::<(), varna_core::TokenizerError>(())
//! ```

pub mod error;
pub use error::{Result, TokenizerError};

// Core BPE algorithm modules
pub mod core;
pub use self::core::{
    merge_in_place, MergeCandidate, MergeMap, MergeRule, MergeRules, MergeStats, Model, Pair,
    PairPriorityQueue, Vocabulary, BYTE_TOKENS,
};

// Pre-segmentation
pub mod pre_tokenizer;
pub use pre_tokenizer::{pre_segment, Splitter, HINDI_PATTERN};

// Encoding
pub mod encoding;
pub use encoding::{decode, decode_bytes, encode, ByteLevelEncoder};
