//! Decode command implementation.

use clap::Parser;

/// Decode command arguments.
#[derive(Parser)]
pub struct DecodeCommand {
    /// Path to the trained tokenizer model
    #[arg(short, long)]
    pub tokenizer: String,

    /// Token IDs to decode (comma or space separated)
    #[arg(short = 'k', long)]
    pub tokens: String,
}

use super::load_tokenizer;
use anyhow::{Context, Result as AnyhowResult};

pub fn run(cmd: DecodeCommand) -> AnyhowResult<()> {
    let tokenizer = load_tokenizer(&cmd.tokenizer)?;
    let ids = parse_ids(&cmd.tokens)?;

    let text = tokenizer.decode(&ids)?;
    println!("{}", text);

    Ok(())
}

fn parse_ids(tokens: &str) -> AnyhowResult<Vec<u32>> {
    tokens
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .with_context(|| format!("Invalid token ID '{s}'"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids() {
        assert_eq!(parse_ids("1,2, 3").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_ids("256 257\n9").unwrap(), vec![256, 257, 9]);
        assert!(parse_ids("").unwrap().is_empty());
        assert!(parse_ids("1,x").is_err());
    }
}
