//! 32-bit x86 instruction decoder.

use super::immediate::{read_immediate, read_relative};
use super::modrm::{decode_modrm_reg, decode_operand, ModRM, OperandTruncated};
use super::opcodes::{
    self, Direction, OpcodeEntry, Rule, ShiftCount, Width, GROUP1_OPS, GROUP2_OPS, GROUP3_OPS,
    GROUP5_OPS,
};
use super::prefix::{rep_string_op, DispatchMode};
use crate::cursor::{ByteCursor, OutOfBytes};
use crate::error::{DecodeError, Field};
use crate::traits::{Decoded, Disassembler, PrefixMarker};
use disforge_core::{Condition, Instruction, Operand, Operation, Register, RelativeDisplay};

/// Opcode, ModR/M, SIB, disp32, imm32.
const MAX_INSTRUCTION_SIZE: usize = 11;

/// Context for immediates that follow a ModR/M operand.
const IMMEDIATE_CONTEXT: &str = "immediate";

/// Where a truncation is reported: the step's start offset and the category
/// named in the marker.
#[derive(Debug, Clone, Copy)]
struct Site {
    offset: u64,
    context: &'static str,
}

impl Site {
    fn short(self, field: Field, short: OutOfBytes) -> DecodeError {
        DecodeError::truncated(self.offset, self.context, field, short)
    }

    fn operand(self, fault: OperandTruncated) -> DecodeError {
        self.short(fault.field, fault.short)
    }

    fn immediate(self) -> Self {
        Self {
            context: IMMEDIATE_CONTEXT,
            ..self
        }
    }
}

/// 32-bit x86 instruction decoder.
///
/// Stateless. Prefix state is carried between steps by the caller through
/// [`DispatchMode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct X86Disassembler;

impl X86Disassembler {
    /// Creates a new decoder.
    pub fn new() -> Self {
        Self
    }

    fn read_modrm(cursor: &mut ByteCursor<'_>, site: Site) -> Result<ModRM, DecodeError> {
        cursor
            .read_u8()
            .map(ModRM::parse)
            .map_err(|short| site.short(Field::ModRm, short))
    }

    fn read_rm(
        cursor: &mut ByteCursor<'_>,
        modrm: ModRM,
        site: Site,
    ) -> Result<Operand, DecodeError> {
        decode_operand(modrm, cursor).map_err(|fault| site.operand(fault))
    }

    fn decode_any(
        &self,
        cursor: &mut ByteCursor<'_>,
        start: usize,
        offset: u64,
    ) -> Result<Decoded, DecodeError> {
        let opcode = cursor.read_u8().map_err(|short| {
            DecodeError::truncated(offset, "instruction", Field::Opcode, short)
        })?;

        let entry = opcodes::lookup(opcode)
            .ok_or_else(|| DecodeError::unknown_opcode(offset, &[opcode]))?;
        let site = Site {
            offset,
            context: entry.context,
        };

        let (mnemonic, operation, operands) = match entry.rule {
            Rule::Prefix(prefix) => {
                return Ok(Decoded::Prefix(PrefixMarker { offset, prefix }));
            }

            Rule::Escape => return self.decode_escape(cursor, start, offset),

            Rule::Fixed => (entry.mnemonic.to_string(), entry.operation, Vec::new()),

            Rule::OpReg => (
                entry.mnemonic.to_string(),
                entry.operation,
                vec![Operand::reg(opcode)],
            ),

            Rule::OpRegImm(width) => {
                let imm = read_immediate(cursor, width).map_err(|f| site.operand(f))?;
                (
                    entry.mnemonic.to_string(),
                    entry.operation,
                    vec![Operand::reg(opcode), imm],
                )
            }

            Rule::Imm(width) => {
                let imm = read_immediate(cursor, width).map_err(|f| site.operand(f))?;
                (entry.mnemonic.to_string(), entry.operation, vec![imm])
            }

            Rule::ModRm(direction) => {
                let modrm = Self::read_modrm(cursor, site)?;
                let rm = Self::read_rm(cursor, modrm, site)?;
                let reg = decode_modrm_reg(modrm);
                let operands = match direction {
                    Direction::RmReg => vec![rm, reg],
                    Direction::RegRm => vec![reg, rm],
                };
                (entry.mnemonic.to_string(), entry.operation, operands)
            }

            Rule::RmImm(width) => {
                let modrm = Self::read_modrm(cursor, site)?;
                let rm = Self::read_rm(cursor, modrm, site)?;
                let imm = read_immediate(cursor, width)
                    .map_err(|f| site.immediate().operand(f))?;
                (entry.mnemonic.to_string(), entry.operation, vec![rm, imm])
            }

            Rule::Group1(width) => {
                let modrm = Self::read_modrm(cursor, site)?;
                let (mnemonic, operation) = GROUP1_OPS[modrm.reg as usize];
                let rm = Self::read_rm(cursor, modrm, site)?;
                let imm = read_immediate(cursor, width)
                    .map_err(|f| site.immediate().operand(f))?;
                (mnemonic.to_string(), operation, vec![rm, imm])
            }

            Rule::Group2(count) => {
                let modrm = Self::read_modrm(cursor, site)?;
                let (mnemonic, operation) = GROUP2_OPS[modrm.reg as usize];
                let rm = Self::read_rm(cursor, modrm, site)?;
                let count = match count {
                    ShiftCount::Imm8 => read_immediate(cursor, Width::Byte)
                        .map_err(|f| site.immediate().operand(f))?,
                    ShiftCount::One => Operand::Count(1),
                    ShiftCount::Cl => Operand::Register(Register::CL),
                };
                (mnemonic.to_string(), operation, vec![rm, count])
            }

            Rule::Group3(width) => {
                let modrm = Self::read_modrm(cursor, site)?;
                let (mnemonic, operation) = GROUP3_OPS[modrm.reg as usize];
                let mut operands = vec![Self::read_rm(cursor, modrm, site)?];
                if operation == Operation::Test {
                    let imm = read_immediate(cursor, width)
                        .map_err(|f| site.immediate().operand(f))?;
                    operands.push(imm);
                }
                (mnemonic.to_string(), operation, operands)
            }

            Rule::Group5 => {
                let modrm = Self::read_modrm(cursor, site)?;
                let (mnemonic, operation) =
                    GROUP5_OPS[modrm.reg as usize].ok_or(DecodeError::UnknownSubOpcode {
                        offset,
                        opcode,
                        sub: modrm.reg,
                    })?;
                let rm = Self::read_rm(cursor, modrm, site)?;
                (mnemonic.to_string(), operation, vec![rm])
            }

            Rule::Jcc => {
                let rel = read_relative(cursor, Width::Byte, RelativeDisplay::Displacement)
                    .map_err(|f| site.operand(f))?;
                let condition = Condition::from_opcode(opcode);
                (
                    format!("{}{}", entry.mnemonic, condition.name()),
                    entry.operation,
                    vec![rel],
                )
            }

            Rule::Rel(width, display) => {
                let rel =
                    read_relative(cursor, width, display).map_err(|f| site.operand(f))?;
                (entry.mnemonic.to_string(), entry.operation, vec![rel])
            }

            // Extend only appears in the 0x0F table
            Rule::Extend { .. } => return Err(DecodeError::unknown_opcode(offset, &[opcode])),
        };

        Ok(Self::finish(cursor, start, offset, mnemonic, operation, operands))
    }

    /// 0x0F has been consumed. The second byte is only consumed once it is
    /// known to name an instruction.
    fn decode_escape(
        &self,
        cursor: &mut ByteCursor<'_>,
        start: usize,
        offset: u64,
    ) -> Result<Decoded, DecodeError> {
        let site = Site {
            offset,
            context: "0F instruction",
        };
        let second = match cursor.peek(1) {
            Some(&[byte]) => byte,
            _ => {
                return Err(site.short(
                    Field::Opcode,
                    OutOfBytes {
                        needed: 1,
                        available: 0,
                    },
                ))
            }
        };

        let entry: &OpcodeEntry = opcodes::lookup_0f(second)
            .ok_or_else(|| DecodeError::unknown_opcode(offset, &[0x0F, second]))?;
        cursor
            .read_u8()
            .map_err(|short| site.short(Field::Opcode, short))?;

        let Rule::Extend { byte_ptr } = entry.rule else {
            return Err(DecodeError::unknown_opcode(offset, &[0x0F, second]));
        };
        let site = Site {
            offset,
            context: entry.context,
        };
        let modrm = Self::read_modrm(cursor, site)?;
        let rm = Self::read_rm(cursor, modrm, site)?;
        let source = if byte_ptr { rm.byte_ptr() } else { rm };

        Ok(Self::finish(
            cursor,
            start,
            offset,
            entry.mnemonic.to_string(),
            entry.operation,
            vec![decode_modrm_reg(modrm), source],
        ))
    }

    /// A REP prefix has been reported; only the string moves are accepted.
    fn decode_rep_string(
        &self,
        cursor: &mut ByteCursor<'_>,
        start: usize,
        offset: u64,
    ) -> Result<Decoded, DecodeError> {
        let opcode = cursor.read_u8().map_err(|short| {
            DecodeError::truncated(offset, "REP instruction", Field::Opcode, short)
        })?;
        let (mnemonic, operation) =
            rep_string_op(opcode).ok_or(DecodeError::UnknownRep { offset, opcode })?;

        Ok(Self::finish(
            cursor,
            start,
            offset,
            mnemonic.to_string(),
            operation,
            Vec::new(),
        ))
    }

    fn finish(
        cursor: &ByteCursor<'_>,
        start: usize,
        offset: u64,
        mnemonic: String,
        operation: Operation,
        operands: Vec<Operand>,
    ) -> Decoded {
        let bytes = cursor.consumed_since(start).to_vec();
        Decoded::Instruction(
            Instruction::new(offset, bytes, mnemonic)
                .with_operation(operation)
                .with_operands(operands),
        )
    }
}

impl Disassembler for X86Disassembler {
    fn decode_step(
        &self,
        cursor: &mut ByteCursor<'_>,
        mode: DispatchMode,
    ) -> Result<Decoded, DecodeError> {
        let start = cursor.position();
        let offset = cursor.offset();
        match mode {
            DispatchMode::Any => self.decode_any(cursor, start, offset),
            DispatchMode::RepString => self.decode_rep_string(cursor, start, offset),
        }
    }

    fn min_instruction_size(&self) -> usize {
        1
    }

    fn max_instruction_size(&self) -> usize {
        MAX_INSTRUCTION_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::x86::Prefix;

    fn decode(bytes: &[u8]) -> Result<Decoded, DecodeError> {
        X86Disassembler::new().decode_instruction(bytes, 0)
    }

    /// Decodes an instruction and returns its text and size.
    fn text(bytes: &[u8]) -> (String, usize) {
        match decode(bytes) {
            Ok(Decoded::Instruction(inst)) => (inst.to_string(), inst.size),
            other => panic!("expected an instruction for {bytes:02x?}, got {other:?}"),
        }
    }

    fn marker(bytes: &[u8]) -> String {
        decode(bytes).unwrap_err().to_string()
    }

    #[test]
    fn test_nop() {
        assert_eq!(text(&[0x90]), ("NOP".to_string(), 1));
    }

    #[test]
    fn test_fixed_forms() {
        assert_eq!(text(&[0xC3]).0, "RET");
        assert_eq!(text(&[0xCC]).0, "INT3");
    }

    #[test]
    fn test_string_forms() {
        let forms = [
            (0xA4, "MOVSB"),
            (0xA5, "MOVSD"),
            (0xA6, "CMPSB"),
            (0xA7, "CMPSD"),
            (0xAA, "STOSB"),
            (0xAB, "STOSD"),
            (0xAC, "LODSB"),
            (0xAD, "LODSD"),
            (0xAE, "SCASB"),
            (0xAF, "SCASD"),
        ];
        for (opcode, mnemonic) in forms {
            let Ok(Decoded::Instruction(inst)) = decode(&[opcode, 0x90]) else {
                panic!("opcode {opcode:#04x} did not decode");
            };
            assert_eq!((inst.mnemonic.as_str(), inst.size), (mnemonic, 1));
            assert_eq!(inst.operation, Operation::StringOp);
            assert!(inst.operands.is_empty());
        }
    }

    #[test]
    fn test_opcode_register_forms() {
        assert_eq!(text(&[0x40]).0, "INC EAX");
        assert_eq!(text(&[0x4F]).0, "DEC EDI");
        assert_eq!(text(&[0x55]).0, "PUSH EBP");
        assert_eq!(text(&[0x5C]).0, "POP ESP");
    }

    #[test]
    fn test_mov_immediates() {
        assert_eq!(
            text(&[0xB8, 0x78, 0x56, 0x34, 0x12]),
            ("MOV EAX, 0x12345678".to_string(), 5)
        );
        assert_eq!(text(&[0xB1, 0x7F]), ("MOV ECX, 0x7f".to_string(), 2));
    }

    #[test]
    fn test_push_immediates() {
        assert_eq!(text(&[0x6A, 0x10]).0, "PUSH 0x10");
        assert_eq!(text(&[0x68, 0x01, 0x00, 0x00, 0x00]).0, "PUSH 0x00000001");
    }

    #[test]
    fn test_arithmetic_direction() {
        assert_eq!(text(&[0x03, 0xC1]), ("ADD EAX, ECX".to_string(), 2));
        assert_eq!(text(&[0x01, 0xCB]).0, "ADD EBX, ECX");
        assert_eq!(text(&[0x29, 0xC3]).0, "SUB EBX, EAX");
        assert_eq!(text(&[0x31, 0xC0]).0, "XOR EAX, EAX");
        assert_eq!(text(&[0x3B, 0x45, 0x08]).0, "CMP EAX, [EBP + 0x8]");
    }

    #[test]
    fn test_accumulator_forms_use_modrm() {
        // 0x05 is read as ADD r/m, reg with a ModR/M byte
        assert_eq!(text(&[0x05, 0xC8]), ("ADD EAX, ECX".to_string(), 2));
    }

    #[test]
    fn test_immediate_group() {
        assert_eq!(text(&[0x83, 0xE8, 0x05]), ("SUB EAX, 0x05".to_string(), 3));
        assert_eq!(text(&[0x80, 0xF9, 0x41]).0, "CMP ECX, 0x41");
        assert_eq!(
            text(&[0x81, 0xC4, 0x00, 0x01, 0x00, 0x00]),
            ("ADD ESP, 0x00000100".to_string(), 6)
        );
    }

    #[test]
    fn test_mov_modrm() {
        assert_eq!(text(&[0x89, 0xC3]).0, "MOV EBX, EAX");
        assert_eq!(text(&[0x8B, 0x04, 0x88]), ("MOV EAX, [EAX + ECX*4]".to_string(), 3));
        assert_eq!(text(&[0x89, 0x45, 0xFC]).0, "MOV [EBP - 0x4], EAX");
    }

    #[test]
    fn test_mov_rm_imm() {
        assert_eq!(text(&[0xC6, 0x00, 0x41]).0, "MOV [EAX], 0x41");
        assert_eq!(
            text(&[0xC7, 0x05, 0x00, 0x10, 0x00, 0x00, 0x2A, 0x00, 0x00, 0x00]),
            ("MOV [0x1000], 0x0000002a".to_string(), 10)
        );
    }

    #[test]
    fn test_lea_test_xchg() {
        assert_eq!(text(&[0x8D, 0x44, 0x24, 0x04]).0, "LEA EAX, [ESP + 0x4]");
        assert_eq!(text(&[0x85, 0xC0]).0, "TEST EAX, EAX");
        assert_eq!(text(&[0x86, 0xC1]).0, "XCHG ECX, EAX");
    }

    #[test]
    fn test_shift_counts() {
        assert_eq!(text(&[0xD1, 0xE0]).0, "SHL EAX, 1");
        assert_eq!(text(&[0xD3, 0xE8]).0, "SHR EAX, CL");
        assert_eq!(text(&[0xC1, 0xF8, 0x04]), ("SAR EAX, 0x04".to_string(), 3));
        assert_eq!(text(&[0xD0, 0xC0]).0, "ROL EAX, 1");
    }

    #[test]
    fn test_unary_group() {
        assert_eq!(text(&[0xF7, 0xE3]).0, "MUL EBX");
        assert_eq!(text(&[0xF7, 0xD8]).0, "NEG EAX");
        assert_eq!(text(&[0xF6, 0xC1, 0x01]), ("TEST ECX, 0x01".to_string(), 3));
        assert_eq!(
            text(&[0xF7, 0xC0, 0xFF, 0x00, 0x00, 0x00]).0,
            "TEST EAX, 0x000000ff"
        );
    }

    #[test]
    fn test_group5() {
        assert_eq!(text(&[0xFF, 0xC0]).0, "INC EAX");
        assert_eq!(text(&[0xFF, 0xC8]).0, "DEC EAX");
        assert_eq!(text(&[0xFF, 0xD0]).0, "CALL EAX");
        assert_eq!(text(&[0xFF, 0x20]).0, "JMP [EAX]");
    }

    #[test]
    fn test_group5_unknown_consumes_modrm_only() {
        let bytes = [0xFF, 0x35, 0x00, 0x10, 0x00, 0x00];
        let mut cursor = ByteCursor::new(&bytes);
        let err = X86Disassembler::new()
            .decode_step(&mut cursor, DispatchMode::Any)
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown FF instruction");
        assert!(!err.is_fatal());
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_conditional_jump() {
        let (text, size) = text(&[0x74, 0x05]);
        assert_eq!(text, "JE/Z 0x05");
        assert_eq!(size, 2);

        let Ok(Decoded::Instruction(inst)) = decode(&[0x7F, 0xFE]) else {
            unreachable!()
        };
        assert_eq!(inst.mnemonic, "JNLE/G");
        assert_eq!(inst.operation, Operation::ConditionalJump);
    }

    #[test]
    fn test_call_jmp_rel32() {
        let decoded = X86Disassembler::new()
            .decode_instruction(&[0xE8, 0x12, 0x34, 0x56, 0x78], 0x18)
            .unwrap();
        let Decoded::Instruction(inst) = decoded else {
            unreachable!()
        };
        assert_eq!(inst.to_string(), "CALL 0x7856342f");
        assert_eq!(inst.operation, Operation::Call);

        assert_eq!(text(&[0xE9, 0xFB, 0xFF, 0xFF, 0xFF]).0, "JMP 0x00000000");
    }

    #[test]
    fn test_rel8_branches() {
        assert_eq!(text(&[0xEB, 0xFE]).0, "JMP 0xfe");
        assert_eq!(text(&[0xE0, 0x10]).0, "LOOPNZ 0x10");
        assert_eq!(text(&[0xE1, 0xFC]), ("LOOPZ 0xfc".to_string(), 2));
        assert_eq!(text(&[0xE3, 0x02]).0, "JECXZ 0x02");
        // LOOP shows the resolved target
        assert_eq!(text(&[0xE2, 0x02]).0, "LOOP 0x04");
    }

    #[test]
    fn test_movzx_movsx() {
        assert_eq!(text(&[0x0F, 0xB6, 0xC0]), ("MOVZX EAX, BYTE PTR EAX".to_string(), 3));
        assert_eq!(text(&[0x0F, 0xBE, 0xC0]).0, "MOVSX EAX, BYTE PTR EAX");
        assert_eq!(text(&[0x0F, 0xB7, 0x03]).0, "MOVZX EAX, [EBX]");
        assert_eq!(text(&[0x0F, 0xB7, 0xC1]), ("MOVZX EAX, ECX".to_string(), 3));
        assert_eq!(text(&[0x0F, 0xBF, 0xD3]), ("MOVSX EDX, EBX".to_string(), 3));
        assert_eq!(text(&[0x0F, 0xBF, 0x4D, 0x08]).0, "MOVSX ECX, [EBP + 0x8]");
    }

    #[test]
    fn test_unknown_escape_consumes_one_byte() {
        let bytes = [0x0F, 0x05];
        let mut cursor = ByteCursor::new(&bytes);
        let err = X86Disassembler::new()
            .decode_step(&mut cursor, DispatchMode::Any)
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown 0F instruction");
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_unknown_opcode() {
        let bytes = [0x0E, 0x90];
        let mut cursor = ByteCursor::new(&bytes);
        let err = X86Disassembler::new()
            .decode_step(&mut cursor, DispatchMode::Any)
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown instruction: 0x0e");
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_prefixes() {
        for (byte, prefix) in [(0xF0, Prefix::Lock), (0xF2, Prefix::Repnz), (0xF3, Prefix::Rep)] {
            let decoded = decode(&[byte, 0x90]).unwrap();
            assert_eq!(decoded, Decoded::Prefix(PrefixMarker { offset: 0, prefix }));
            assert_eq!(decoded.size(), 1);
        }
    }

    #[test]
    fn test_repnz_dispatches_modrm_forms() {
        let disasm = X86Disassembler::new();
        let bytes = [0xF2, 0x8B, 0x45, 0x08];
        let mut cursor = ByteCursor::new(&bytes);

        let prefix = disasm.decode_step(&mut cursor, DispatchMode::Any).unwrap();
        let Decoded::Prefix(marker) = prefix else {
            unreachable!()
        };
        assert_eq!(marker.prefix.continuation(), DispatchMode::Any);

        let mode = marker.prefix.continuation();
        let Ok(Decoded::Instruction(inst)) = disasm.decode_step(&mut cursor, mode) else {
            unreachable!()
        };
        assert_eq!(inst.to_string(), "MOV EAX, [EBP + 0x8]");
        assert_eq!((inst.offset, inst.size), (1, 3));
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_rep_string_mode() {
        let disasm = X86Disassembler::new();
        let bytes = [0xA4, 0x90];
        let mut cursor = ByteCursor::with_origin(&bytes, 1);

        let Ok(Decoded::Instruction(inst)) =
            disasm.decode_step(&mut cursor, DispatchMode::RepString)
        else {
            unreachable!()
        };
        assert_eq!((inst.offset, inst.mnemonic.as_str()), (1, "MOVSB"));

        let err = disasm
            .decode_step(&mut cursor, DispatchMode::RepString)
            .unwrap_err();
        assert_eq!(err, DecodeError::UnknownRep { offset: 2, opcode: 0x90 });
        assert!(cursor.is_empty());

        let err = disasm
            .decode_step(&mut cursor, DispatchMode::RepString)
            .unwrap_err();
        assert_eq!(err.to_string(), "Incomplete REP instruction");
        assert_eq!(err.offset(), 3);
    }

    #[test]
    fn test_truncation_markers() {
        assert_eq!(marker(&[0xB8]), "Incomplete MOV imm32");
        assert_eq!(marker(&[0xB0]), "Incomplete MOV imm8");
        assert_eq!(marker(&[0x89]), "Incomplete MOV instruction");
        assert_eq!(marker(&[0x8B, 0x05, 0x00]), "Incomplete MOV instruction (disp32)");
        assert_eq!(marker(&[0x8B, 0x04]), "Incomplete MOV instruction (SIB byte)");
        assert_eq!(marker(&[0x03, 0x45]), "Incomplete arithmetic instruction (disp8)");
        assert_eq!(marker(&[0x83]), "Incomplete immediate arithmetic");
        assert_eq!(marker(&[0x83, 0xC0]), "Incomplete immediate");
        assert_eq!(marker(&[0x68, 0x01]), "Incomplete PUSH imm32");
        assert_eq!(marker(&[0x6A]), "Incomplete PUSH imm8");
        assert_eq!(marker(&[0xC6]), "Incomplete MOV r/m8, imm8");
        assert_eq!(marker(&[0xC7, 0xC0, 0x01]), "Incomplete immediate");
        assert_eq!(marker(&[0x74]), "Incomplete conditional jump");
        assert_eq!(marker(&[0xE8, 0x00]), "Incomplete CALL");
        assert_eq!(marker(&[0xE9]), "Incomplete JMP");
        assert_eq!(marker(&[0xEB]), "Incomplete JMP rel8");
        assert_eq!(marker(&[0x8D]), "Incomplete LEA");
        assert_eq!(marker(&[0x85]), "Incomplete TEST");
        assert_eq!(marker(&[0x87]), "Incomplete XCHG");
        assert_eq!(marker(&[0xD1]), "Incomplete shift/rotate");
        assert_eq!(marker(&[0xC1, 0xE0]), "Incomplete immediate");
        assert_eq!(marker(&[0xF7]), "Incomplete MUL/IMUL/DIV/IDIV");
        assert_eq!(marker(&[0xF6, 0xC0]), "Incomplete immediate");
        assert_eq!(marker(&[0x0F]), "Incomplete 0F instruction");
        assert_eq!(marker(&[0x0F, 0xB6]), "Incomplete 0F instruction");
        assert_eq!(marker(&[0xFF]), "Incomplete FF instruction");
        assert_eq!(marker(&[0xE0]), "Incomplete LOOPNZ");
        assert_eq!(marker(&[0xE1]), "Incomplete LOOPZ");
        assert_eq!(marker(&[0xE2]), "Incomplete LOOP");
        assert_eq!(marker(&[0xE3]), "Incomplete JECXZ");
    }

    #[test]
    fn test_truncation_field() {
        let err = decode(&[0xB8, 0x01, 0x02]).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.field(), Some(Field::Imm32));
        assert_eq!(
            err,
            DecodeError::Truncated {
                offset: 0,
                context: "MOV imm32",
                field: Field::Imm32,
                needed: 4,
                available: 2,
            }
        );
    }

    #[test]
    fn test_max_size_instruction() {
        // MOV [EAX + ECX*4 + disp32], imm32
        let bytes = [0xC7, 0x84, 0x88, 0x00, 0x10, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00];
        let (text, size) = text(&bytes);
        assert_eq!(text, "MOV [EAX + ECX*4 + 0x1000], 0x00000001");
        assert_eq!(size, X86Disassembler::new().max_instruction_size());
    }
}
