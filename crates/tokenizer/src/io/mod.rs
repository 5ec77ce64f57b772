//! Serialization and deserialization for BPE models.
//!
//! This module provides functionality for saving and loading trained
//! tokenizers as a single JSON document.

pub mod format;
pub mod load;
pub mod save;

pub use format::{SerializedMerge, SerializedModel, SerializedToken, MODEL_FILE};
pub use load::TokenizerLoader;
pub use save::{model_file, TokenizerSaver};
