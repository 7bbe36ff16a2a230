//! x86 prefix handling.
//!
//! Prefixes are not folded into the instruction that follows them. Each one
//! is reported as its own listing line, and the prefix decides how the next
//! byte is dispatched.

use disforge_core::Operation;

/// Group 1 prefixes recognised by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Prefix {
    /// LOCK prefix (0xF0)
    Lock,
    /// REP/REPE/REPZ prefix (0xF3)
    Rep,
    /// REPNE/REPNZ prefix (0xF2)
    Repnz,
}

/// How the byte after a prefix is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// Full opcode table.
    #[default]
    Any,
    /// Only the string moves in [`REP_STRING_OPS`].
    RepString,
}

/// Operations accepted after a REP prefix.
pub static REP_STRING_OPS: [(u8, &str, Operation); 2] = [
    (0xA4, "MOVSB", Operation::StringOp),
    (0xA5, "MOVSD", Operation::StringOp),
];

impl Prefix {
    /// Recognise a prefix byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0xF0 => Some(Self::Lock),
            0xF2 => Some(Self::Repnz),
            0xF3 => Some(Self::Rep),
            _ => None,
        }
    }

    /// Listing name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Lock => "LOCK",
            Self::Repnz => "REPNZ",
            Self::Rep => "REP",
        }
    }

    /// Dispatch mode for the byte following this prefix.
    ///
    /// LOCK and REPNZ hand the next byte to the full table. REP only accepts
    /// MOVSB and MOVSD.
    pub fn continuation(&self) -> DispatchMode {
        match self {
            Self::Lock | Self::Repnz => DispatchMode::Any,
            Self::Rep => DispatchMode::RepString,
        }
    }
}

impl std::fmt::Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Look up the string operation a REP prefix applies to.
pub fn rep_string_op(byte: u8) -> Option<(&'static str, Operation)> {
    REP_STRING_OPS
        .iter()
        .find(|(opcode, _, _)| *opcode == byte)
        .map(|&(_, mnemonic, operation)| (mnemonic, operation))
}
