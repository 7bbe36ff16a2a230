//! Input loading for the CLI.

use anyhow::{bail, Context, Result};
use disforge_disasm::demo::SAMPLE_PROGRAM;
use std::fs;
use std::path::PathBuf;

/// Where the machine code comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Hex(String),
    Demo,
}

impl Source {
    /// Loads the raw bytes.
    pub fn load(&self) -> Result<Vec<u8>> {
        match self {
            Self::File(path) => fs::read(path)
                .with_context(|| format!("Failed to read input file: {}", path.display())),
            Self::Hex(text) => parse_hex_bytes(text).context("Invalid --hex input"),
            Self::Demo => Ok(SAMPLE_PROGRAM.to_vec()),
        }
    }
}

/// Parses an offset given in hex, with or without a `0x` prefix.
pub fn parse_hex(s: &str) -> Result<u64, String> {
    let s = strip_hex_prefix(s.trim());
    u64::from_str_radix(s, 16).map_err(|e| e.to_string())
}

/// Parses bytes written as hex text.
///
/// Tokens are separated by whitespace or commas and may carry a `0x` prefix.
/// A token may hold several bytes (`b878563412`) but must have an even number
/// of digits.
pub fn parse_hex_bytes(text: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();

    for token in text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        let digits = strip_hex_prefix(token);
        if digits.is_empty() {
            bail!("empty hex token `{token}`");
        }
        if digits.len() % 2 != 0 {
            bail!("odd number of hex digits in `{token}`");
        }
        for pair in digits.as_bytes().chunks(2) {
            let pair = std::str::from_utf8(pair)
                .ok()
                .filter(|p| p.chars().all(|c| c.is_ascii_hexdigit()))
                .with_context(|| format!("invalid hex digits in `{token}`"))?;
            bytes.push(u8::from_str_radix(pair, 16)?);
        }
    }

    Ok(bytes)
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}
