//! Benchmark command implementation.

use clap::Parser;

/// Benchmark command arguments.
#[derive(Parser)]
pub struct BenchmarkCommand {
    /// Path to the trained tokenizer model
    #[arg(short, long)]
    pub tokenizer: String,

    /// Path to input text file for benchmarking
    #[arg(short, long)]
    pub input: String,

    /// Number of iterations to run
    #[arg(short = 'n', long, default_value_t = 100)]
    pub iterations: usize,
}

use super::{load_tokenizer, read_input};
use anyhow::{ensure, Result as AnyhowResult};
use std::time::Instant;

pub fn run(cmd: BenchmarkCommand) -> AnyhowResult<()> {
    ensure!(cmd.iterations > 0, "iterations must be at least 1");

    let tokenizer = load_tokenizer(&cmd.tokenizer)?;
    let text = read_input(&cmd.input, true)?;

    println!("Benchmarking encoding...");
    println!("  Text length: {} bytes", text.len());
    println!("  Iterations: {}", cmd.iterations);
    println!();

    // Warmup
    let tokens = tokenizer.encode(&text).len();

    let start = Instant::now();
    for _ in 0..cmd.iterations {
        std::hint::black_box(tokenizer.encode(std::hint::black_box(&text)));
    }
    let elapsed = start.elapsed();

    let avg_secs = elapsed.as_secs_f64() / cmd.iterations as f64;
    let (tokens_per_sec, mb_per_sec) = if avg_secs > 0.0 {
        (
            tokens as f64 / avg_secs,
            text.len() as f64 / avg_secs / 1_000_000.0,
        )
    } else {
        (0.0, 0.0)
    };

    println!("Results:");
    println!("  Tokens per pass: {}", tokens);
    println!("  Total time: {:.2}s", elapsed.as_secs_f64());
    println!("  Average time: {:.3}ms", avg_secs * 1000.0);
    println!("  Throughput: {:.0} tokens/s ({:.2} MB/s)", tokens_per_sec, mb_per_sec);

    Ok(())
}
