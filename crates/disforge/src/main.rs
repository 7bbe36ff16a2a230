//! disforge - a 32-bit x86 disassembler
//!
//! Usage:
//!   disforge <file>                Disassemble a raw machine-code file
//!   disforge --hex "90 b8 ..."     Disassemble bytes given as hex text
//!   disforge --demo                Disassemble the built-in sample program

mod input;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use disforge_disasm::{Listing, ListingConfig};
use input::{parse_hex, Source};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "disforge", version)]
#[command(about = "A 32-bit x86 disassembler", long_about = None)]
#[command(group(ArgGroup::new("source").required(true).args(["input", "hex", "demo"])))]
struct Cli {
    /// Path to a raw machine-code file
    input: Option<PathBuf>,

    /// Bytes to disassemble, as hex text (e.g. "90 b8 78 56 34 12 c3")
    #[arg(long, value_name = "BYTES")]
    hex: Option<String>,

    /// Disassemble the built-in sample program
    #[arg(long)]
    demo: bool,

    /// Offset of the first byte, in hex
    #[arg(long, value_parser = parse_hex, default_value = "0")]
    origin: u64,

    /// Stop after this many lines
    #[arg(short, long)]
    count: Option<usize>,

    /// Print the listing as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn source(&self) -> Source {
        if let Some(path) = &self.input {
            Source::File(path.clone())
        } else if let Some(hex) = &self.hex {
            Source::Hex(hex.clone())
        } else {
            Source::Demo
        }
    }

    fn config(&self) -> ListingConfig {
        let config = ListingConfig::default().with_origin(self.origin);
        match self.count {
            Some(count) => config.with_limit(count),
            None => config,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr so stdout carries only the listing
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let source = cli.source();
    let bytes = source.load()?;
    info!(?source, len = bytes.len(), "loaded input");

    let listing = Listing::with_config(&bytes, cli.config());
    if listing.truncated {
        debug!(consumed = listing.consumed, "listing ended on a truncated instruction");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &listing).context("Failed to write JSON listing")?;
        writeln!(out).context("Failed to write JSON listing")?;
    } else {
        listing.write_to(&mut out).context("Failed to write listing")?;
    }
    out.flush().context("Failed to flush output")?;

    Ok(())
}
