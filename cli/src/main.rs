//! Varna CLI - Command-line interface for the Hindi BPE tokenizer.
//!
//! This is the main entry point for the `varna` command-line tool.

mod commands;

use clap::{Parser, Subcommand};
use commands::{BenchmarkCommand, DecodeCommand, EncodeCommand, StatsCommand, TrainCommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "varna")]
#[command(about = "A byte-level BPE tokenizer for Hindi text", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a new tokenizer from a text corpus
    Train(TrainCommand),
    /// Encode text to token IDs
    Encode(EncodeCommand),
    /// Decode token IDs back to text
    Decode(DecodeCommand),
    /// Report compression statistics
    Stats(StatsCommand),
    /// Benchmark encoding performance
    Benchmark(BenchmarkCommand),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(cmd) => commands::train::run(cmd)?,
        Commands::Encode(cmd) => commands::encode::run(cmd)?,
        Commands::Decode(cmd) => commands::decode::run(cmd)?,
        Commands::Stats(cmd) => commands::stats::run(cmd)?,
        Commands::Benchmark(cmd) => commands::benchmark::run(cmd)?,
    }

    Ok(())
}
