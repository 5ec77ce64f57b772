//! Pre-segmentation applied before byte-pair statistics or encoding.
//!
//! Segments are merge boundaries: no token ever spans two of them.

pub mod split;

pub use split::{pre_segment, Segments, Splitter, HINDI_PATTERN};
