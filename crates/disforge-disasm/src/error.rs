//! Decode error types.
//!
//! The `Display` output of [`DecodeError`] is the marker text that appears in
//! the listing in place of an instruction.

use crate::cursor::OutOfBytes;
use thiserror::Error;

/// The instruction field that ran out of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Field {
    /// Opcode byte (including the byte after an escape or REP prefix).
    Opcode,
    ModRm,
    Sib,
    Disp8,
    Disp32,
    Imm8,
    Imm32,
    Rel8,
    Rel32,
}

impl Field {
    /// Returns a short human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Opcode => "opcode",
            Self::ModRm => "ModR/M byte",
            Self::Sib => "SIB byte",
            Self::Disp8 => "disp8",
            Self::Disp32 => "disp32",
            Self::Imm8 => "imm8",
            Self::Imm32 => "imm32",
            Self::Rel8 => "rel8",
            Self::Rel32 => "rel32",
        }
    }

    /// Addressing fields are called out in the marker; the category already
    /// names everything else.
    fn marker_suffix(&self) -> String {
        match self {
            Self::Sib | Self::Disp8 | Self::Disp32 => format!(" ({})", self.name()),
            _ => String::new(),
        }
    }
}

/// Error type for instruction decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A required field extends past the end of the input. Ends the pass.
    #[error("Incomplete {context}{}", .field.marker_suffix())]
    Truncated {
        offset: u64,
        context: &'static str,
        field: Field,
        needed: usize,
        available: usize,
    },

    /// No rule for the primary opcode, or for the byte after `0x0F`.
    #[error("{}", unknown_opcode_text(.bytes))]
    UnknownOpcode { offset: u64, bytes: Vec<u8> },

    /// The ModR/M `reg` field selects no operation in the group.
    #[error("Unknown {opcode:02X} instruction")]
    UnknownSubOpcode { offset: u64, opcode: u8, sub: u8 },

    /// The byte after a REP prefix is not a supported string operation.
    #[error("Unknown REP instruction")]
    UnknownRep { offset: u64, opcode: u8 },
}

fn unknown_opcode_text(bytes: &[u8]) -> String {
    match bytes {
        [0x0F, ..] => "Unknown 0F instruction".to_string(),
        [opcode, ..] => format!("Unknown instruction: {:#04x}", opcode),
        [] => "Unknown instruction".to_string(),
    }
}

impl DecodeError {
    /// Creates a new Truncated error.
    pub fn truncated(offset: u64, context: &'static str, field: Field, short: OutOfBytes) -> Self {
        Self::Truncated {
            offset,
            context,
            field,
            needed: short.needed,
            available: short.available,
        }
    }

    /// Creates a new UnknownOpcode error.
    pub fn unknown_opcode(offset: u64, bytes: &[u8]) -> Self {
        Self::UnknownOpcode {
            offset,
            bytes: bytes.to_vec(),
        }
    }

    /// Offset of the instruction the error belongs to.
    pub fn offset(&self) -> u64 {
        match self {
            Self::Truncated { offset, .. }
            | Self::UnknownOpcode { offset, .. }
            | Self::UnknownSubOpcode { offset, .. }
            | Self::UnknownRep { offset, .. } => *offset,
        }
    }

    /// Returns true if decoding cannot continue after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }

    /// The short field, for truncation errors.
    pub fn field(&self) -> Option<Field> {
        match self {
            Self::Truncated { field, .. } => Some(*field),
            _ => None,
        }
    }
}
