//! Train command implementation.

use clap::Parser;

/// Train command arguments.
#[derive(Parser)]
pub struct TrainCommand {
    /// Path to the training corpus (UTF-8 text)
    #[arg(short, long)]
    pub input: String,

    /// Output directory (or `.json` file) for the trained model
    #[arg(short, long)]
    pub output: String,

    /// Target vocabulary size (must be greater than 256)
    #[arg(short, long, default_value_t = 5000)]
    pub vocab_size: usize,

    /// Minimum pair frequency for a merge
    #[arg(short, long, default_value_t = 2)]
    pub min_frequency: u64,

    /// Train on a single thread
    #[arg(long, default_value_t = false)]
    pub no_parallel: bool,

    /// Log progress every this many merges
    #[arg(long, default_value_t = 100)]
    pub log_interval: usize,
}

use anyhow::{Context, Result as AnyhowResult};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::info;
use varna_tokenizer::Tokenizer;

pub fn run(cmd: TrainCommand) -> AnyhowResult<()> {
    info!(
        input = %cmd.input,
        output = %cmd.output,
        vocab_size = cmd.vocab_size,
        min_frequency = cmd.min_frequency,
        parallel = !cmd.no_parallel,
        "Training tokenizer"
    );

    // Validate before reading a possibly large corpus
    let mut tokenizer = Tokenizer::builder()
        .vocab_size(cmd.vocab_size)
        .min_frequency(cmd.min_frequency)
        .parallel(!cmd.no_parallel)
        .log_interval(cmd.log_interval)
        .build()?;

    let start = Instant::now();
    let data =
        fs::read_to_string(&cmd.input).with_context(|| format!("Failed to read {}", cmd.input))?;
    info!(
        bytes = data.len(),
        secs = start.elapsed().as_secs_f64(),
        "Read corpus"
    );

    let start = Instant::now();
    let summary = tokenizer.train(&data)?;
    let elapsed = start.elapsed();

    let path = tokenizer.save(Path::new(&cmd.output))?;

    println!("Training completed in {:.2}s", elapsed.as_secs_f64());
    println!("  Corpus: {} chars, {} bytes", summary.corpus_chars, summary.corpus_bytes);
    println!(
        "  Segments: {} ({} distinct)",
        summary.total_segments, summary.distinct_segments
    );
    println!("  Merges learned: {}", summary.merges);
    println!("  Final vocab size: {} / {}", summary.vocab_len, cmd.vocab_size);
    println!("  Corpus compression: {:.2} bytes/token", summary.compression_ratio());
    println!("Model saved to {}", path.display());

    Ok(())
}
