//! Defrag CLI
//!
//! Reads one run-length encoded layout line, compacts it under the selected
//! placement policy, and prints the resulting checksum.

use clap::{Parser, ValueEnum};
use defrag::{DefragError, Disk, Policy, Result};
use std::io::Read;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "defrag")]
#[command(about = "Compact a run-length encoded disk layout and print its checksum")]
struct Args {
    /// Path to the layout file, or `-` to read from stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Placement policy
    #[arg(short, long, value_enum, default_value_t = PolicyArg::Greedy)]
    policy: PolicyArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Fill the earliest gap with the tail of the last file (files may split)
    Greedy,
    /// First fit: each file moves at most once and never splits
    WholeFile,
}

impl From<PolicyArg> for Policy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Greedy => Policy::Greedy,
            PolicyArg::WholeFile => Policy::WholeFile,
        }
    }
}

fn read_line(input: &PathBuf) -> Result<String> {
    let raw = if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input)?
    };
    let line = raw.lines().next().ok_or(DefragError::EmptyInput)?;
    Ok(line.to_string())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let line = read_line(&args.input)?;

    let disk = Disk::parse(&line)?;
    debug!(
        files = disk.files.len(),
        gaps = disk.free.len(),
        total_len = disk.total_len,
        "parsed layout"
    );

    let compacted = Policy::from(args.policy).compact(&disk)?;
    println!("{}", compacted.checksum());
    Ok(())
}
