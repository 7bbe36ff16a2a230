//! Disassembler traits.

use crate::cursor::ByteCursor;
use crate::x86::{DispatchMode, Prefix};
use crate::DecodeError;
use disforge_core::Instruction;

/// A prefix byte reported on its own line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrefixMarker {
    /// Offset of the prefix byte.
    pub offset: u64,
    pub prefix: Prefix,
}

/// Result of one decode step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// A complete instruction.
    Instruction(Instruction),
    /// A prefix; the next step is dispatched in the prefix's continuation mode.
    Prefix(PrefixMarker),
}

impl Decoded {
    /// Offset of the first byte of the step.
    pub fn offset(&self) -> u64 {
        match self {
            Self::Instruction(inst) => inst.offset,
            Self::Prefix(marker) => marker.offset,
        }
    }

    /// Number of bytes consumed.
    pub fn size(&self) -> usize {
        match self {
            Self::Instruction(inst) => inst.size,
            Self::Prefix(_) => 1,
        }
    }
}

/// Trait for instruction decoders.
pub trait Disassembler {
    /// Decode one step at the cursor.
    ///
    /// On success the cursor is left after the decoded bytes. On a
    /// recoverable error it is left after the bytes the marker covers, so the
    /// caller can resume from there. After a fatal error the cursor position
    /// is unspecified.
    fn decode_step(
        &self,
        cursor: &mut ByteCursor<'_>,
        mode: DispatchMode,
    ) -> Result<Decoded, DecodeError>;

    /// Decode a single step starting at `offset`.
    fn decode_instruction(&self, bytes: &[u8], offset: u64) -> Result<Decoded, DecodeError> {
        let mut cursor = ByteCursor::with_origin(bytes, offset);
        self.decode_step(&mut cursor, DispatchMode::Any)
    }

    /// Returns the minimum instruction size.
    fn min_instruction_size(&self) -> usize;

    /// Returns the maximum instruction size.
    fn max_instruction_size(&self) -> usize;
}
