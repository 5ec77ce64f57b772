//! Encode command implementation.

use clap::Parser;

/// Encode command arguments.
#[derive(Parser)]
pub struct EncodeCommand {
    /// Path to the trained tokenizer model
    #[arg(short, long)]
    pub tokenizer: String,

    /// Text to encode (`-` reads stdin)
    #[arg(short, long)]
    pub input: String,

    /// Treat the input as a file path
    #[arg(short, long, default_value_t = false)]
    pub file: bool,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<String>,
}

use super::{load_tokenizer, read_input};
use anyhow::{Context, Result as AnyhowResult};

pub fn run(cmd: EncodeCommand) -> AnyhowResult<()> {
    let tokenizer = load_tokenizer(&cmd.tokenizer)?;
    let input_text = read_input(&cmd.input, cmd.file)?;

    let encoding = tokenizer.encode(&input_text);
    let output = encoding.ids_as_strings().join(" ");

    match &cmd.output {
        Some(path) => {
            std::fs::write(path, &output).with_context(|| format!("Failed to write {path}"))?;
            println!("Encoded {} tokens to {}", encoding.len(), path);
        }
        None => {
            println!("{}", output);
        }
    }

    Ok(())
}
