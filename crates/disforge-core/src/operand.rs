//! Instruction operand types.

use crate::Register;

/// An instruction operand.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operand {
    /// Register operand.
    Register(Register),
    /// Memory reference.
    Memory(MemoryRef),
    /// Immediate value.
    Immediate(Immediate),
    /// Relative branch operand (jumps, calls, loops).
    Relative(Relative),
    /// Literal count printed in decimal (the implicit `1` of `SHL r/m, 1`).
    Count(u8),
    /// Operand annotated with a `BYTE PTR` size override.
    BytePtr(Box<Operand>),
}

impl Operand {
    /// Creates a register operand, masking the code to 3 bits.
    pub fn reg(code: u8) -> Self {
        Self::Register(Register::new(code))
    }

    /// Creates an 8-bit immediate operand.
    pub fn imm8(value: u8) -> Self {
        Self::Immediate(Immediate {
            value: value as u32,
            size: 8,
        })
    }

    /// Creates a 32-bit immediate operand.
    pub fn imm32(value: u32) -> Self {
        Self::Immediate(Immediate { value, size: 32 })
    }

    /// Wraps this operand in a `BYTE PTR` annotation.
    pub fn byte_ptr(self) -> Self {
        Self::BytePtr(Box::new(self))
    }

    /// Returns true if this is a register operand.
    pub fn is_register(&self) -> bool {
        matches!(self, Self::Register(_))
    }
}

/// Immediate value operand. The value is kept as the raw unsigned bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Immediate {
    /// Raw value, zero-extended.
    pub value: u32,
    /// Encoded size in bits (8 or 32).
    pub size: u8,
}

/// What a relative operand prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RelativeDisplay {
    /// The raw encoded displacement.
    Displacement,
    /// The resolved target, truncated to the encoded width.
    Target,
}

/// Relative branch operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relative {
    /// Signed displacement from the end of the instruction.
    pub delta: i32,
    /// End-of-instruction offset plus `delta`, wrapping in 32 bits.
    pub target: u32,
    /// Encoded size of the displacement in bits (8 or 32).
    pub size: u8,
    /// Which of the two values the listing shows.
    pub display: RelativeDisplay,
}

impl Relative {
    /// Resolves a displacement against the offset of the following instruction.
    pub fn new(delta: i32, next_offset: u64, size: u8, display: RelativeDisplay) -> Self {
        Self {
            delta,
            target: (next_offset as u32).wrapping_add(delta as u32),
            size,
            display,
        }
    }
}

/// Memory reference operand.
///
/// Represents `[base + index*scale + disp]` addressing. Any of the three
/// components may be absent; `mod == 0, rm == 5` produces a reference with
/// only a displacement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryRef {
    /// Base register (if any).
    pub base: Option<Register>,
    /// Index register (if any).
    pub index: Option<Register>,
    /// Scale factor for index (1, 2, 4, or 8).
    pub scale: u8,
    /// Displacement, when one was encoded (even if zero).
    pub displacement: Option<i32>,
}

impl MemoryRef {
    /// Creates a full SIB-style memory reference.
    pub fn sib(
        base: Option<Register>,
        index: Option<Register>,
        scale: u8,
        displacement: Option<i32>,
    ) -> Self {
        Self {
            base,
            index,
            scale,
            displacement,
        }
    }
}

impl std::fmt::Display for MemoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        let mut has_content = false;

        if let Some(base) = self.base {
            write!(f, "{}", base)?;
            has_content = true;
        }

        if let Some(index) = self.index {
            if has_content {
                write!(f, " + ")?;
            }
            write!(f, "{}", index)?;
            if self.scale > 1 {
                write!(f, "*{}", self.scale)?;
            }
            has_content = true;
        }

        if let Some(disp) = self.displacement {
            // i64 so that i32::MIN has a magnitude
            let disp = disp as i64;
            match (has_content, disp < 0) {
                (true, true) => write!(f, " - 0x{:x}", -disp)?,
                (true, false) => write!(f, " + 0x{:x}", disp)?,
                (false, true) => write!(f, "-0x{:x}", -disp)?,
                (false, false) => write!(f, "0x{:x}", disp)?,
            }
        }

        write!(f, "]")
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Register(reg) => write!(f, "{}", reg),
            Self::Memory(mem) => write!(f, "{}", mem),
            Self::Immediate(imm) => match imm.size {
                8 => write!(f, "0x{:02x}", imm.value),
                _ => write!(f, "0x{:08x}", imm.value),
            },
            Self::Relative(rel) => {
                let value = match rel.display {
                    RelativeDisplay::Displacement => rel.delta as u32,
                    RelativeDisplay::Target => rel.target,
                };
                match rel.size {
                    8 => write!(f, "0x{:02x}", value as u8),
                    _ => write!(f, "0x{:08x}", value),
                }
            }
            Self::Count(n) => write!(f, "{}", n),
            Self::BytePtr(inner) => write!(f, "BYTE PTR {}", inner),
        }
    }
}
