//! CLI commands for the varna tokenizer.

pub mod benchmark;
pub mod decode;
pub mod encode;
pub mod stats;
pub mod train;

pub use benchmark::BenchmarkCommand;
pub use decode::DecodeCommand;
pub use encode::EncodeCommand;
pub use stats::StatsCommand;
pub use train::TrainCommand;

use anyhow::{Context, Result as AnyhowResult};
use std::io::Read;
use std::path::Path;
use varna_tokenizer::Tokenizer;

/// Load a tokenizer from a model directory or `.json` file.
pub(crate) fn load_tokenizer(path: &str) -> AnyhowResult<Tokenizer> {
    Tokenizer::load(Path::new(path)).with_context(|| format!("Failed to load tokenizer from {path}"))
}

/// Resolve a text argument: `-` reads stdin, `from_file` treats it as a path.
pub(crate) fn read_input(input: &str, from_file: bool) -> AnyhowResult<String> {
    if input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        Ok(buffer)
    } else if from_file {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))
    } else {
        Ok(input.to_string())
    }
}
