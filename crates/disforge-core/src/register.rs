//! 32-bit x86 general-purpose register representation.

use crate::Error;

/// 32-bit register names, indexed by the 3-bit register code.
pub static DWORD_NAMES: [&str; 8] = ["EAX", "ECX", "EDX", "EBX", "ESP", "EBP", "ESI", "EDI"];

/// 8-bit register names, indexed by the 3-bit register code.
pub static BYTE_NAMES: [&str; 8] = ["AL", "CL", "DL", "BL", "AH", "CH", "DH", "BH"];

/// Register codes as they appear in ModR/M, SIB and opcode fields.
pub mod x86 {
    pub const EAX: u8 = 0;
    pub const ECX: u8 = 1;
    pub const EDX: u8 = 2;
    pub const EBX: u8 = 3;
    pub const ESP: u8 = 4;
    pub const EBP: u8 = 5;
    pub const ESI: u8 = 6;
    pub const EDI: u8 = 7;
}

/// Width of a general-purpose register view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegisterWidth {
    /// AL, CL, DL, BL, AH, CH, DH, BH
    Byte,
    /// EAX through EDI
    #[default]
    Dword,
}

impl RegisterWidth {
    fn names(&self) -> &'static [&'static str; 8] {
        match self {
            Self::Byte => &BYTE_NAMES,
            Self::Dword => &DWORD_NAMES,
        }
    }
}

/// A general-purpose register.
///
/// The code is always kept in `0..8`. [`Register::new`] masks larger values
/// to their low three bits, which is what the decoder relies on for fields it
/// has already extracted from a byte. [`Register::try_new`] is the strict
/// variant for callers that want out-of-range codes reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Register {
    /// Register code (0..8).
    pub code: u8,
    /// Register view width.
    pub width: RegisterWidth,
}

impl Register {
    /// The CL register, used as a shift count.
    pub const CL: Self = Self {
        code: x86::ECX,
        width: RegisterWidth::Byte,
    };

    /// Creates a 32-bit register, masking the code to 3 bits.
    pub fn new(code: u8) -> Self {
        Self {
            code: code & 0x7,
            width: RegisterWidth::Dword,
        }
    }

    /// Creates a 32-bit register, rejecting codes outside `0..8`.
    pub fn try_new(code: u8) -> Result<Self, Error> {
        if code > 0x7 {
            return Err(Error::RegisterOutOfRange(code));
        }
        Ok(Self::new(code))
    }

    /// Returns the canonical upper-case name.
    pub fn name(&self) -> &'static str {
        self.width.names()[(self.code & 0x7) as usize]
    }
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
