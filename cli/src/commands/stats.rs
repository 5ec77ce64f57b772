//! Stats command implementation.

use clap::Parser;

/// Stats command arguments.
#[derive(Parser)]
pub struct StatsCommand {
    /// Path to the trained tokenizer model
    #[arg(short, long)]
    pub tokenizer: String,

    /// Text to analyse (`-` reads stdin)
    #[arg(short, long)]
    pub input: String,

    /// Treat the input as a file path
    #[arg(short, long, default_value_t = false)]
    pub file: bool,
}

use super::{load_tokenizer, read_input};
use anyhow::Result as AnyhowResult;
use varna_tokenizer::CompressionStats;

pub fn run(cmd: StatsCommand) -> AnyhowResult<()> {
    let tokenizer = load_tokenizer(&cmd.tokenizer)?;
    let text = read_input(&cmd.input, cmd.file)?;

    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.len() <= 1 {
        println!("{}", tokenizer.stats(text.trim_end_matches('\n')));
        return Ok(());
    }

    let reports: Vec<CompressionStats> = lines.iter().map(|l| tokenizer.stats(l)).collect();
    for (line, report) in lines.iter().zip(&reports) {
        println!("{line}");
        println!("  {report}");
    }

    let overall = CompressionStats::combine(&reports);
    println!();
    println!("Overall: {overall}");
    println!("  Chars per token: {:.2}", overall.chars_per_token());

    Ok(())
}
