//! ModR/M and SIB byte decoding.

use crate::cursor::{ByteCursor, OutOfBytes};
use crate::error::Field;
use disforge_core::{MemoryRef, Operand, Register};

/// Decoded ModR/M byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModRM {
    /// Mod field (2 bits)
    pub mod_: u8,
    /// Reg field (3 bits), a register or an opcode extension
    pub reg: u8,
    /// R/M field (3 bits)
    pub rm: u8,
}

impl ModRM {
    /// Parse a ModR/M byte.
    pub fn parse(byte: u8) -> Self {
        Self {
            mod_: (byte >> 6) & 0x3,
            reg: (byte >> 3) & 0x7,
            rm: byte & 0x7,
        }
    }

    /// Returns true if this ModR/M encodes a register operand (mod=11).
    pub fn is_register(&self) -> bool {
        self.mod_ == 0b11
    }

    /// Returns true if this ModR/M requires a SIB byte.
    pub fn needs_sib(&self) -> bool {
        self.mod_ != 0b11 && self.rm == 0b100
    }

    /// Returns true if this ModR/M is followed by a 32-bit displacement
    /// without a SIB byte deciding otherwise.
    pub fn has_disp32(&self) -> bool {
        self.mod_ == 0b10 || self.is_absolute()
    }

    /// Returns true if this ModR/M has an 8-bit displacement.
    pub fn has_disp8(&self) -> bool {
        self.mod_ == 0b01
    }

    /// mod=00, rm=101: disp32 with no base register.
    pub fn is_absolute(&self) -> bool {
        self.mod_ == 0b00 && self.rm == 0b101
    }
}

/// Decoded SIB byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sib {
    /// Scale (2 bits) - actual scale is 1 << scale
    pub scale: u8,
    /// Index register (3 bits), 4 means no index
    pub index: u8,
    /// Base register (3 bits)
    pub base: u8,
}

impl Sib {
    /// Parse a SIB byte.
    pub fn parse(byte: u8) -> Self {
        Self {
            scale: (byte >> 6) & 0x3,
            index: (byte >> 3) & 0x7,
            base: byte & 0x7,
        }
    }

    /// Returns the actual scale factor (1, 2, 4, or 8).
    pub fn scale_factor(&self) -> u8 {
        1 << self.scale
    }

    /// Index 100 encodes "no index register".
    pub fn has_index(&self) -> bool {
        self.index != 0b100
    }

    /// With mod=00, base 101 means disp32 and no base register.
    pub fn has_base(&self, modrm: ModRM) -> bool {
        !(modrm.mod_ == 0b00 && self.base == 0b101)
    }
}

/// The operand decoder ran out of bytes in one of its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperandTruncated {
    /// `Sib`, `Disp8` or `Disp32`.
    pub field: Field,
    pub short: OutOfBytes,
}

/// Decode the reg field of ModR/M as a register operand.
pub fn decode_modrm_reg(modrm: ModRM) -> Operand {
    Operand::reg(modrm.reg)
}

/// Decode the r/m operand selected by `modrm`, consuming any SIB and
/// displacement bytes that follow it.
pub fn decode_operand(
    modrm: ModRM,
    cursor: &mut ByteCursor<'_>,
) -> Result<Operand, OperandTruncated> {
    // Register operand
    if modrm.is_register() {
        return Ok(Operand::reg(modrm.rm));
    }

    // Memory operand
    let mut base: Option<Register> = None;
    let mut index: Option<Register> = None;
    let mut scale: u8 = 1;
    let mut disp32 = modrm.has_disp32();

    if modrm.needs_sib() {
        let sib = cursor.read_u8().map(Sib::parse).map_err(|short| OperandTruncated {
            field: Field::Sib,
            short,
        })?;

        if sib.has_index() {
            index = Some(Register::new(sib.index));
            scale = sib.scale_factor();
        }

        if sib.has_base(modrm) {
            base = Some(Register::new(sib.base));
        } else {
            disp32 = true;
        }
    } else if !modrm.is_absolute() {
        base = Some(Register::new(modrm.rm));
    }

    let displacement = if disp32 {
        let disp = cursor.read_i32_le().map_err(|short| OperandTruncated {
            field: Field::Disp32,
            short,
        })?;
        Some(disp)
    } else if modrm.has_disp8() {
        let disp = cursor.read_i8().map_err(|short| OperandTruncated {
            field: Field::Disp8,
            short,
        })?;
        Some(disp as i32)
    } else {
        None
    };

    Ok(Operand::Memory(MemoryRef::sib(base, index, scale, displacement)))
}
