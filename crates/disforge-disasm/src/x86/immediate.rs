//! Immediate and relative operand readers.

use super::modrm::OperandTruncated;
use super::opcodes::Width;
use crate::cursor::ByteCursor;
use crate::error::Field;
use disforge_core::{Operand, Relative, RelativeDisplay};

/// Read an immediate operand of the given width.
pub fn read_immediate(
    cursor: &mut ByteCursor<'_>,
    width: Width,
) -> Result<Operand, OperandTruncated> {
    match width {
        Width::Byte => cursor
            .read_u8()
            .map(Operand::imm8)
            .map_err(|short| OperandTruncated {
                field: Field::Imm8,
                short,
            }),
        Width::Dword => cursor
            .read_u32_le()
            .map(Operand::imm32)
            .map_err(|short| OperandTruncated {
                field: Field::Imm32,
                short,
            }),
    }
}

/// Read a relative displacement and resolve it against the end of the
/// instruction, which is the cursor offset once the field is consumed.
pub fn read_relative(
    cursor: &mut ByteCursor<'_>,
    width: Width,
    display: RelativeDisplay,
) -> Result<Operand, OperandTruncated> {
    let delta = match width {
        Width::Byte => cursor.read_i8().map(i32::from).map_err(|short| OperandTruncated {
            field: Field::Rel8,
            short,
        })?,
        Width::Dword => cursor.read_i32_le().map_err(|short| OperandTruncated {
            field: Field::Rel32,
            short,
        })?,
    };

    Ok(Operand::Relative(Relative::new(
        delta,
        cursor.offset(),
        width.bits(),
        display,
    )))
}
