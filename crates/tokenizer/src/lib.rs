//! Varna-tokenizer - High-level tokenizer API
//!
//! This crate provides a user-friendly interface for Hindi byte-level BPE
//! tokenization, integrating training, the encoder and persistence into a
//! single, easy-to-use API.
//!
//! # Features
//!
//! - Simple builder pattern for tokenizer configuration
//! - Training on a single text or a stream of documents
//! - Parallel batch encoding
//! - Compression statistics
//! - Validated JSON persistence
//!
//! # Example
//!
//! ```rust
//! use varna_tokenizer::Tokenizer;
//!
//! let mut tokenizer = Tokenizer::builder()
//!     .vocab_size(300)
//!     .build()?;
//! tokenizer.train("भारत एक महान देश है। भारत एक महान देश है।")?;
//!
//! // Encode text
//! let encoding = tokenizer.encode("भारत एक देश है।");
//! println!("{:?}", encoding.ids);
//!
//! // Decode tokens
//! let text = tokenizer.decode(&encoding.ids)?;
//! assert_eq!(text, "भारत एक देश है।");
//! # Ok::<(), varna_tokenizer::TokenizerError>(())
//! ```

// Re-export core types
pub use varna_core::{decode, decode_bytes, encode, Model, Result, TokenizerError};
pub use varna_training::TrainingSummary;

// Tokenizer API
pub mod tokenizer;
pub use tokenizer::{
    stats, train, CompressionStats, Encoding, Tokenizer, TokenizerBuilder, TokenizerConfig,
};

// IO/Serialization
pub mod io;
pub use io::{SerializedModel, TokenizerLoader, TokenizerSaver};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
