//! Listing pass: decode a whole buffer into offset-prefixed lines.
//!
//! Each step produces exactly one [`Line`]. Recoverable decode errors become
//! [`Line::Unknown`] markers and the pass resumes after the bytes they cover.
//! A truncated instruction produces a final [`Line::Truncated`] marker and
//! ends the pass.

use crate::cursor::ByteCursor;
use crate::traits::{Decoded, Disassembler, PrefixMarker};
use crate::x86::{DispatchMode, X86Disassembler};
use disforge_core::Instruction;
use std::fmt;
use std::io;
use tracing::{debug, trace, warn};

/// One line of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum Line {
    Instruction(Instruction),
    Prefix(PrefixMarker),
    /// Recoverable marker (unknown opcode, sub-opcode or REP operation).
    Unknown { offset: u64, message: String },
    /// Terminal marker for an instruction that runs past the end of input.
    Truncated { offset: u64, message: String },
}

impl Line {
    /// Offset printed at the start of the line.
    pub fn offset(&self) -> u64 {
        match self {
            Self::Instruction(inst) => inst.offset,
            Self::Prefix(marker) => marker.offset,
            Self::Unknown { offset, .. } | Self::Truncated { offset, .. } => *offset,
        }
    }

    /// The line without its offset.
    pub fn text(&self) -> String {
        match self {
            Self::Instruction(inst) => inst.to_string(),
            Self::Prefix(marker) => marker.prefix.to_string(),
            Self::Unknown { message, .. } | Self::Truncated { message, .. } => message.clone(),
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, Self::Unknown { .. } | Self::Truncated { .. })
    }
}

impl From<Decoded> for Line {
    fn from(decoded: Decoded) -> Self {
        match decoded {
            Decoded::Instruction(inst) => Self::Instruction(inst),
            Decoded::Prefix(marker) => Self::Prefix(marker),
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}: {}", self.offset(), self.text())
    }
}

/// Options for a listing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingConfig {
    /// Offset of the first input byte.
    pub origin: u64,
    /// Stop after this many lines.
    pub limit: Option<usize>,
}

impl ListingConfig {
    pub fn with_origin(mut self, origin: u64) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// The lines produced by one decode pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Listing {
    pub lines: Vec<Line>,
    /// Input bytes covered by non-terminal lines.
    pub consumed: usize,
    /// True if the pass ended on a truncated instruction.
    pub truncated: bool,
}

impl Listing {
    /// Disassembles `bytes` starting at offset 0.
    pub fn new(bytes: &[u8]) -> Self {
        Self::with_config(bytes, ListingConfig::default())
    }

    /// Disassembles `bytes` with the x86 decoder.
    pub fn with_config(bytes: &[u8], config: ListingConfig) -> Self {
        Self::decode_with(&X86Disassembler::new(), bytes, config)
    }

    /// Runs a listing pass with any decoder.
    pub fn decode_with<D: Disassembler>(disasm: &D, bytes: &[u8], config: ListingConfig) -> Self {
        debug!(
            len = bytes.len(),
            origin = config.origin,
            limit = ?config.limit,
            "starting listing pass"
        );

        let mut cursor = ByteCursor::with_origin(bytes, config.origin);
        let mut mode = DispatchMode::Any;
        let mut listing = Self::default();

        loop {
            if config.limit.is_some_and(|limit| listing.lines.len() >= limit) {
                break;
            }
            // A pending REP still needs its string operation, even at the end
            if cursor.is_empty() && mode == DispatchMode::Any {
                break;
            }

            let start = cursor.position();
            match disasm.decode_step(&mut cursor, mode) {
                Ok(decoded) => {
                    trace!(offset = decoded.offset(), size = decoded.size(), "decoded step");
                    mode = match &decoded {
                        Decoded::Prefix(marker) => marker.prefix.continuation(),
                        Decoded::Instruction(_) => DispatchMode::Any,
                    };
                    listing.lines.push(decoded.into());
                }
                Err(err) if err.is_fatal() => {
                    trace!(offset = err.offset(), field = ?err.field(), "truncated");
                    listing.lines.push(Line::Truncated {
                        offset: err.offset(),
                        message: err.to_string(),
                    });
                    listing.truncated = true;
                    break;
                }
                Err(err) => {
                    trace!(offset = err.offset(), %err, "unknown");
                    mode = DispatchMode::Any;
                    listing.lines.push(Line::Unknown {
                        offset: err.offset(),
                        message: err.to_string(),
                    });
                }
            }

            if cursor.position() <= start {
                warn!(offset = cursor.offset(), "decoder made no progress, stopping");
                break;
            }
            listing.consumed = cursor.position();
        }

        debug!(
            lines = listing.lines.len(),
            consumed = listing.consumed,
            truncated = listing.truncated,
            "listing pass finished"
        );
        listing
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }

    /// Instructions in the listing, skipping prefixes and markers.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.lines.iter().filter_map(|line| match line {
            Line::Instruction(inst) => Some(inst),
            _ => None,
        })
    }

    /// Writes the listing, one line per step.
    pub fn write_to<W: io::Write>(&self, mut out: W) -> io::Result<()> {
        for line in &self.lines {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Listing {
    type Item = &'a Line;
    type IntoIter = std::slice::Iter<'a, Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Disassembles `bytes` from offset 0.
pub fn disassemble(bytes: &[u8]) -> Listing {
    Listing::new(bytes)
}
