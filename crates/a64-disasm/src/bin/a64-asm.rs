use anyhow::{anyhow, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use a64_disasm::model::words_to_bytes;
use a64_sim::assemble_words;

#[derive(Parser, Debug)]
#[command(author, version, about = "Tiny A64 assembler (ADD family)")]
struct Opts {
    /// Input assembly file (one instruction per line)
    #[arg(short, long)]
    input: PathBuf,
    /// Output binary file (little-endian)
    #[arg(short, long)]
    output: PathBuf,
    /// Also print each word in hex
    #[arg(long)]
    hex: bool,
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    let src = fs::read_to_string(&opts.input)?;
    let words = assemble_words(&src).map_err(|e| {
        let line = src.lines().nth(e.line().saturating_sub(1)).unwrap_or("");
        anyhow!("{}: {e}\n    {}", opts.input.display(), line.trim())
    })?;
    if opts.hex {
        for (i, w) in words.iter().enumerate() {
            println!("{:#06x}: {w:08x}", i * 4);
        }
    }
    fs::write(&opts.output, words_to_bytes(&words))?;
    Ok(())
}
