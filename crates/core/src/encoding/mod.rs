//! Encoding modes for BPE tokenization.
//!
//! Only byte-level encoding is provided: text is treated as UTF-8 bytes and
//! the learned merge rules are applied inside each pre-segment.

pub mod byte_level;

pub use byte_level::{decode, decode_bytes, encode, ByteLevelEncoder};
