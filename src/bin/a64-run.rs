use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use a64_sim::{assemble_words, A64Decoder, Machine, MachineConfig};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Assemble an A64 source file and run it on the a64-sim core"
)]
struct Opts {
    /// Load address of the first instruction
    #[arg(short, long, default_value_t = 0u64)]
    entry: u64,
    /// Initial stack pointer
    #[arg(long, default_value_t = 0u64)]
    sp: u64,
    /// Set a register before running, e.g. `--set x3=10` (repeatable)
    #[arg(long = "set", value_name = "REG=VAL")]
    sets: Vec<String>,
    /// Print the final state as JSON
    #[arg(long)]
    json: bool,
    #[arg(value_name = "ASMFILE")]
    input: String,
}

fn parse_set(s: &str) -> Result<(usize, u64)> {
    let (reg, val) = s
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("expected REG=VAL, got {s}"))?;
    let idx: usize = reg
        .trim()
        .trim_start_matches(|c| c == 'x' || c == 'X')
        .parse()
        .map_err(|_| anyhow::anyhow!("bad register: {reg}"))?;
    anyhow::ensure!(idx < 31, "register {reg} out of range (x0-x30)");
    let val = val.trim();
    let val = match val.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16)?,
        None => val.parse()?,
    };
    Ok((idx, val))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    let src = std::fs::read_to_string(&opts.input)?;
    let words = assemble_words(&src).map_err(|e| {
        let line = src.lines().nth(e.line().saturating_sub(1)).unwrap_or("");
        anyhow::anyhow!("{e}\n    {}", line.trim())
    })?;

    let mut m = Machine::new(MachineConfig {
        reset_pc: opts.entry,
        reset_sp: opts.sp,
        ..MachineConfig::default()
    });
    for s in &opts.sets {
        let (idx, val) = parse_set(s)?;
        m.r[idx] = val;
    }
    m.load_program(opts.entry, &words)?;

    let end = opts.entry + 4 * words.len() as u64;
    let dec = A64Decoder::new();
    if let Err(trap) = m.run_until(&dec, end, words.len() as u64) {
        eprintln!("TRAP: {trap:?}");
    }

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&m)?);
    } else {
        print!("{m}");
    }
    Ok(())
}
