//! Decoded instruction representation.

use crate::Operand;

/// A decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instruction {
    /// Offset of the first byte.
    pub offset: u64,
    /// Size in bytes (always at least 1).
    pub size: usize,
    /// Raw bytes of the instruction.
    pub bytes: Vec<u8>,
    /// High-level operation category.
    pub operation: Operation,
    /// Mnemonic string (e.g., "MOV", "JE/Z").
    pub mnemonic: String,
    /// Operands (destination first, then sources).
    pub operands: Vec<Operand>,
}

impl Instruction {
    /// Creates a new instruction with no operands.
    pub fn new(offset: u64, bytes: Vec<u8>, mnemonic: impl Into<String>) -> Self {
        Self {
            offset,
            size: bytes.len(),
            bytes,
            operation: Operation::Other,
            mnemonic: mnemonic.into(),
            operands: Vec::new(),
        }
    }

    /// Sets the operation.
    pub fn with_operation(mut self, op: Operation) -> Self {
        self.operation = op;
        self
    }

    /// Sets operands.
    pub fn with_operands(mut self, ops: Vec<Operand>) -> Self {
        self.operands = ops;
        self
    }
}

/// High-level operation categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    // Data movement
    Move,
    MoveZeroExtend,
    MoveSignExtend,
    Push,
    Pop,
    Exchange,
    LoadEffectiveAddress,

    // Arithmetic
    Add,
    AddWithCarry,
    Sub,
    SubWithBorrow,
    Mul,
    Imul,
    Div,
    Idiv,
    Neg,
    Inc,
    Dec,

    // Logical
    And,
    Or,
    Xor,
    Not,
    Shl,
    Shr,
    Sar,
    Rol,
    Ror,
    Rcl,
    Rcr,

    // Comparison
    Compare,
    Test,

    // Control flow
    Jump,
    ConditionalJump,
    Call,
    Return,
    Loop,

    // String operations
    StringOp,

    // System
    Interrupt,
    Nop,

    Other,
}

/// Condition names for `Jcc`, indexed by the low nibble of the opcode.
pub static CONDITION_NAMES: [&str; 16] = [
    "O", "NO", "B/NAE/C", "NB/AE/NC", "E/Z", "NE/NZ", "BE/NA", "NBE/A", "S", "NS", "P/PE", "NP/PO",
    "L/NGE", "NL/GE", "LE/NG", "NLE/G",
];

/// Branch condition for conditional jumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    Overflow,       // OF=1
    NotOverflow,    // OF=0
    Below,          // CF=1
    AboveOrEqual,   // CF=0
    Equal,          // ZF=1
    NotEqual,       // ZF=0
    BelowOrEqual,   // CF=1 or ZF=1
    Above,          // CF=0 and ZF=0
    Sign,           // SF=1
    NotSign,        // SF=0
    Parity,         // PF=1
    NotParity,      // PF=0
    Less,           // SF!=OF
    GreaterOrEqual, // SF=OF
    LessOrEqual,    // ZF=1 or SF!=OF
    Greater,        // ZF=0 and SF=OF
}

impl Condition {
    /// Decodes the condition from the low nibble of a `Jcc` opcode.
    pub fn from_opcode(opcode: u8) -> Self {
        match opcode & 0x0F {
            0x0 => Self::Overflow,
            0x1 => Self::NotOverflow,
            0x2 => Self::Below,
            0x3 => Self::AboveOrEqual,
            0x4 => Self::Equal,
            0x5 => Self::NotEqual,
            0x6 => Self::BelowOrEqual,
            0x7 => Self::Above,
            0x8 => Self::Sign,
            0x9 => Self::NotSign,
            0xA => Self::Parity,
            0xB => Self::NotParity,
            0xC => Self::Less,
            0xD => Self::GreaterOrEqual,
            0xE => Self::LessOrEqual,
            _ => Self::Greater,
        }
    }

    /// Returns the listing name, e.g. `E/Z`.
    pub fn name(&self) -> &'static str {
        CONDITION_NAMES[*self as usize]
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic)?;

        if !self.operands.is_empty() {
            write!(f, " ")?;
            for (i, op) in self.operands.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", op)?;
            }
        }

        Ok(())
    }
}
