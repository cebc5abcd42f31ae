use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::path::Path;

use a64_sim::decoder::{A64Decoder, Decoder};

use a64_disasm::model::{load_raw_bin, read_u32, read_u8, Image};

#[derive(Parser, Debug)]
#[command(author, version, about = "A64 disassembler CLI", long_about=None)]
struct Cli {
    /// Load address for the binary in target address space
    #[arg(long, default_value_t = 0u64)]
    base: u64,
    /// Skip N bytes at start of file before loading
    #[arg(long, default_value_t = 0usize)]
    skip: usize,
    /// Input binary path
    #[arg(value_name = "BINFILE")]
    input: String,
    /// Limit bytes loaded (default: to EOF after --skip)
    #[arg(long)]
    len: Option<usize>,
    /// Subcommand
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List loaded segments (simple single-segment for raw .bin)
    Sections,
    /// Disassemble a range [start, end) in bytes
    Range {
        /// Start address (hex or dec); defaults to the load base
        start: Option<String>,
        /// End address (hex or dec, exclusive); defaults to end of image
        end: Option<String>,
        /// Show instruction bytes
        #[arg(long)]
        show_bytes: bool,
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Write output to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat { Text, Json }

#[derive(Debug, Clone, serde::Serialize)]
struct InsnOut { addr: u64, raw: u32, text: String }

fn parse_u64(s: &str) -> Result<u64> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Ok(u64::from_str_radix(hex, 16)?)
    } else {
        Ok(s.parse::<u64>()?)
    }
}

fn image_end(img: &Image) -> u64 {
    img.segments.iter().map(|s| s.base + s.bytes.len() as u64).max().unwrap_or(0)
}

fn disassemble(img: &Image, start: u64, end: u64) -> Vec<InsnOut> {
    let dec = A64Decoder::new();
    let mut out = Vec::new();
    let mut pc = start;
    while pc < end {
        let Some(raw) = read_u32(img, pc) else { break };
        let text = match dec.decode(raw) {
            Some(op) => op.to_string(),
            None => format!(".word {raw:#010x}"),
        };
        out.push(InsnOut { addr: pc, raw, text });
        pc += 4;
    }
    out
}

fn render_text(img: &Image, insns: &[InsnOut], show_bytes: bool) -> String {
    let mut buf = String::new();
    for i in insns {
        let _ = write!(buf, "{:#010x}: ", i.addr);
        if show_bytes {
            for k in 0..4 {
                let _ = write!(buf, "{:02x} ", read_u8(img, i.addr + k).unwrap_or(0));
            }
            buf.push_str("  ");
        }
        let _ = writeln!(buf, "{}", i.text);
    }
    buf
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let img = load_raw_bin(Path::new(&cli.input), cli.base, cli.skip, cli.len)?;

    match cli.cmd {
        Command::Sections => {
            println!("{:<10} {:<12} {:<12} {:<6} {:<6}", "name", "start", "end", "perms", "kind");
            for s in &img.segments {
                let start = s.base;
                let end = s.base + s.bytes.len() as u64;
                println!(
                    "{:<10} {start:#010x}   {end:#010x}   {:<6} {:<6}",
                    s.name, s.perms, s.kind
                );
            }
        }
        Command::Range { start, end, show_bytes, format, out } => {
            let start = start.as_deref().map(parse_u64).transpose()?.unwrap_or(cli.base);
            let end = end.as_deref().map(parse_u64).transpose()?.unwrap_or_else(|| image_end(&img));
            anyhow::ensure!(end >= start, "end must be >= start");

            let insns = disassemble(&img, start, end);
            let rendered = match format {
                OutputFormat::Text => render_text(&img, &insns, show_bytes),
                OutputFormat::Json => serde_json::to_string_pretty(&insns)? + "\n",
            };
            if let Some(path) = out { std::fs::write(path, rendered)?; } else { print!("{}", rendered); }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use a64_disasm::model::{words_to_bytes, Segment};

    #[test]
    fn parse_u64_hex_and_dec() {
        assert_eq!(parse_u64("0x10").unwrap(), 0x10);
        assert_eq!(parse_u64("16").unwrap(), 16);
        assert!(parse_u64("zz").is_err());
    }

    #[test]
    fn range_disasm_decodes_add_forms() {
        let bytes = words_to_bytes(&[0x9101_EC41, 0x4EA1_8402, 0x0000_0000]);
        let seg = Segment { name: "s".into(), base: 0, bytes, perms: "r-x", kind: "raw" };
        let img = Image { segments: vec![seg] };
        let insns = disassemble(&img, 0, image_end(&img));
        assert_eq!(insns.len(), 3);
        assert_eq!(insns[0].text, "add x1, x2, #0x7b");
        assert_eq!(insns[1].text, "add v2.4s, v0.4s, v1.4s");
        assert_eq!(insns[2].text, ".word 0x00000000");
        let text = render_text(&img, &insns[..1], true);
        assert_eq!(text, "0x00000000: 41 ec 01 91   add x1, x2, #0x7b\n");
    }
}
