//! Varna-training - BPE training infrastructure
//!
//! This crate provides the training algorithms and utilities for learning
//! byte-level BPE merge rules from Hindi text.
//!
//! # Features
//!
//! - Distinct-segment frequency table: identical pre-segments are counted once
//! - Parallel pair counting with rayon
//! - Deterministic merge selection (ties go to the smallest pair)
//! - Configurable training parameters (vocab size, min frequency, etc.)
//!
//! # Example
//!
//! ```rust
//! use varna_training::{BpeTrainer, TrainingConfig};
//!
//! let trainer = BpeTrainer::new(TrainingConfig {
//!     vocab_size: 300,
//!     ..Default::default()
//! });
//! let (model, summary) = trainer.train("का का का कि कि")?;
//! assert!(model.len() <= 300);
//! assert_eq!(summary.merges, model.merges().len());
//! # Ok::<(), varna_training::TokenizerError>(())
//! ```

pub use varna_core::{Result, TokenizerError};

// Training infrastructure
pub mod training;
pub use training::{BpeTrainer, PairCounter, TrainingConfig, TrainingSummary};
