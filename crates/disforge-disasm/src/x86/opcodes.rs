//! 32-bit x86 opcode definitions and lookup.
//!
//! The one-byte table maps every primary opcode to a decoding [`Rule`]. Rules
//! whose mnemonic depends on the ModR/M `reg` field leave the entry mnemonic
//! empty and index one of the group tables instead.

use super::prefix::Prefix;
use disforge_core::{Operation, RelativeDisplay};

/// Width of an immediate or relative field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Byte,
    Dword,
}

impl Width {
    /// Size in bits.
    pub const fn bits(&self) -> u8 {
        match self {
            Self::Byte => 8,
            Self::Dword => 32,
        }
    }
}

/// Operand order for two-operand ModR/M forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// r/m, reg
    RmReg,
    /// reg, r/m
    RegRm,
}

impl Direction {
    /// Direction bit (bit 1) of the opcode.
    pub const fn from_opcode(opcode: u8) -> Self {
        if opcode & 0x02 != 0 {
            Self::RegRm
        } else {
            Self::RmReg
        }
    }
}

/// Second operand of the shift/rotate group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftCount {
    /// imm8 (0xC0, 0xC1)
    Imm8,
    /// literal 1 (0xD0, 0xD1)
    One,
    /// CL (0xD2, 0xD3)
    Cl,
}

/// Decoding rule for one opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// No operands
    Fixed,
    /// Register in the low 3 bits of the opcode
    OpReg,
    /// Register in the opcode, then an immediate
    OpRegImm(Width),
    /// Immediate only
    Imm(Width),
    /// ModR/M with a register and an r/m operand
    ModRm(Direction),
    /// ModR/M r/m operand, then an immediate
    RmImm(Width),
    /// 0x80/0x81/0x83: arithmetic selected by `reg`, then an immediate
    Group1(Width),
    /// Shift/rotate selected by `reg`
    Group2(ShiftCount),
    /// 0xF6/0xF7: TEST/NOT/NEG/MUL/IMUL/DIV/IDIV selected by `reg`
    Group3(Width),
    /// 0xFF: INC/DEC/CALL/JMP selected by `reg`
    Group5,
    /// Conditional jump, condition in the low nibble
    Jcc,
    /// Relative branch
    Rel(Width, RelativeDisplay),
    /// MOVZX/MOVSX; `byte_ptr` marks the 8-bit source forms
    Extend { byte_ptr: bool },
    /// Two-byte opcode escape (0x0F)
    Escape,
    /// Prefix byte
    Prefix(Prefix),
}

/// Opcode table entry.
#[derive(Debug, Clone, Copy)]
pub struct OpcodeEntry {
    /// Mnemonic (empty for group rules)
    pub mnemonic: &'static str,
    /// Operation category
    pub operation: Operation,
    /// Decoding rule
    pub rule: Rule,
    /// Category named in the marker when the instruction is truncated
    pub context: &'static str,
}

impl OpcodeEntry {
    pub const fn new(
        mnemonic: &'static str,
        operation: Operation,
        rule: Rule,
        context: &'static str,
    ) -> Self {
        Self {
            mnemonic,
            operation,
            rule,
            context,
        }
    }

    /// Entry whose mnemonic comes from a group table.
    pub const fn group(rule: Rule, context: &'static str) -> Self {
        Self::new("", Operation::Other, rule, context)
    }
}

/// Arithmetic operations, indexed by `(opcode >> 3) & 7` or ModR/M `reg`.
pub const GROUP1_OPS: [(&str, Operation); 8] = [
    ("ADD", Operation::Add),
    ("OR", Operation::Or),
    ("ADC", Operation::AddWithCarry),
    ("SBB", Operation::SubWithBorrow),
    ("AND", Operation::And),
    ("SUB", Operation::Sub),
    ("XOR", Operation::Xor),
    ("CMP", Operation::Compare),
];

/// Shift/rotate operations (0xC0, 0xC1, 0xD0-0xD3).
pub const GROUP2_OPS: [(&str, Operation); 8] = [
    ("ROL", Operation::Rol),
    ("ROR", Operation::Ror),
    ("RCL", Operation::Rcl),
    ("RCR", Operation::Rcr),
    ("SHL", Operation::Shl),
    ("SHR", Operation::Shr),
    ("SAL", Operation::Shl),
    ("SAR", Operation::Sar),
];

/// Unary group (0xF6/0xF7).
pub const GROUP3_OPS: [(&str, Operation); 8] = [
    ("TEST", Operation::Test), // /0 TEST r/m, imm
    ("TEST", Operation::Test), // /1 alias of /0
    ("NOT", Operation::Not),
    ("NEG", Operation::Neg),
    ("MUL", Operation::Mul),
    ("IMUL", Operation::Imul),
    ("DIV", Operation::Div),
    ("IDIV", Operation::Idiv),
];

/// 0xFF group. Far forms and PUSH r/m are not decoded.
pub const GROUP5_OPS: [Option<(&str, Operation)>; 8] = [
    Some(("INC", Operation::Inc)),
    Some(("DEC", Operation::Dec)),
    Some(("CALL", Operation::Call)),
    None,
    Some(("JMP", Operation::Jump)),
    None,
    None,
    None,
];

/// Const None for array initialization (stable Rust compatibility)
const NONE_ENTRY: Option<OpcodeEntry> = None;

/// One-byte opcode table.
pub static OPCODE_TABLE: [Option<OpcodeEntry>; 256] = {
    let mut table: [Option<OpcodeEntry>; 256] = [NONE_ENTRY; 256];

    // ADD/OR/ADC/SBB/AND/SUB/XOR/CMP: x0-x5 of each 8-byte span, all
    // decoded with a ModR/M byte
    let mut group = 0;
    while group < 8 {
        let (mnemonic, operation) = GROUP1_OPS[group];
        let mut low = 0;
        while low < 6 {
            let opcode = group * 8 + low;
            table[opcode] = Some(OpcodeEntry::new(
                mnemonic,
                operation,
                Rule::ModRm(Direction::from_opcode(opcode as u8)),
                "arithmetic instruction",
            ));
            low += 1;
        }
        group += 1;
    }

    table[0x0F] = Some(OpcodeEntry::group(Rule::Escape, "0F instruction"));

    // INC/DEC/PUSH/POP r32
    let mut reg = 0;
    while reg < 8 {
        table[0x40 + reg] = Some(OpcodeEntry::new("INC", Operation::Inc, Rule::OpReg, "INC"));
        table[0x48 + reg] = Some(OpcodeEntry::new("DEC", Operation::Dec, Rule::OpReg, "DEC"));
        table[0x50 + reg] = Some(OpcodeEntry::new("PUSH", Operation::Push, Rule::OpReg, "PUSH"));
        table[0x58 + reg] = Some(OpcodeEntry::new("POP", Operation::Pop, Rule::OpReg, "POP"));
        reg += 1;
    }

    // PUSH imm
    table[0x68] = Some(OpcodeEntry::new(
        "PUSH",
        Operation::Push,
        Rule::Imm(Width::Dword),
        "PUSH imm32",
    ));
    table[0x6A] = Some(OpcodeEntry::new(
        "PUSH",
        Operation::Push,
        Rule::Imm(Width::Byte),
        "PUSH imm8",
    ));

    // Jcc rel8
    let mut cc = 0;
    while cc < 16 {
        table[0x70 + cc] = Some(OpcodeEntry::new(
            "J",
            Operation::ConditionalJump,
            Rule::Jcc,
            "conditional jump",
        ));
        cc += 1;
    }

    // Immediate arithmetic (0x82 is not decoded)
    table[0x80] = Some(OpcodeEntry::group(Rule::Group1(Width::Byte), "immediate arithmetic"));
    table[0x81] = Some(OpcodeEntry::group(Rule::Group1(Width::Dword), "immediate arithmetic"));
    table[0x83] = Some(OpcodeEntry::group(Rule::Group1(Width::Byte), "immediate arithmetic"));

    // TEST/XCHG r/m, reg
    table[0x84] = Some(OpcodeEntry::new(
        "TEST",
        Operation::Test,
        Rule::ModRm(Direction::RmReg),
        "TEST",
    ));
    table[0x85] = Some(OpcodeEntry::new(
        "TEST",
        Operation::Test,
        Rule::ModRm(Direction::RmReg),
        "TEST",
    ));
    table[0x86] = Some(OpcodeEntry::new(
        "XCHG",
        Operation::Exchange,
        Rule::ModRm(Direction::RmReg),
        "XCHG",
    ));
    table[0x87] = Some(OpcodeEntry::new(
        "XCHG",
        Operation::Exchange,
        Rule::ModRm(Direction::RmReg),
        "XCHG",
    ));

    // MOV with ModR/M, direction bit selects the operand order
    let mut op = 0x88;
    while op <= 0x8B {
        table[op] = Some(OpcodeEntry::new(
            "MOV",
            Operation::Move,
            Rule::ModRm(Direction::from_opcode(op as u8)),
            "MOV instruction",
        ));
        op += 1;
    }

    // LEA reg, m
    table[0x8D] = Some(OpcodeEntry::new(
        "LEA",
        Operation::LoadEffectiveAddress,
        Rule::ModRm(Direction::RegRm),
        "LEA",
    ));

    table[0x90] = Some(OpcodeEntry::new("NOP", Operation::Nop, Rule::Fixed, "NOP"));

    // String operations
    table[0xA4] = Some(OpcodeEntry::new("MOVSB", Operation::StringOp, Rule::Fixed, "MOVSB"));
    table[0xA5] = Some(OpcodeEntry::new("MOVSD", Operation::StringOp, Rule::Fixed, "MOVSD"));
    table[0xA6] = Some(OpcodeEntry::new("CMPSB", Operation::StringOp, Rule::Fixed, "CMPSB"));
    table[0xA7] = Some(OpcodeEntry::new("CMPSD", Operation::StringOp, Rule::Fixed, "CMPSD"));
    table[0xAA] = Some(OpcodeEntry::new("STOSB", Operation::StringOp, Rule::Fixed, "STOSB"));
    table[0xAB] = Some(OpcodeEntry::new("STOSD", Operation::StringOp, Rule::Fixed, "STOSD"));
    table[0xAC] = Some(OpcodeEntry::new("LODSB", Operation::StringOp, Rule::Fixed, "LODSB"));
    table[0xAD] = Some(OpcodeEntry::new("LODSD", Operation::StringOp, Rule::Fixed, "LODSD"));
    table[0xAE] = Some(OpcodeEntry::new("SCASB", Operation::StringOp, Rule::Fixed, "SCASB"));
    table[0xAF] = Some(OpcodeEntry::new("SCASD", Operation::StringOp, Rule::Fixed, "SCASD"));

    // MOV r, imm
    let mut reg = 0;
    while reg < 8 {
        table[0xB0 + reg] = Some(OpcodeEntry::new(
            "MOV",
            Operation::Move,
            Rule::OpRegImm(Width::Byte),
            "MOV imm8",
        ));
        table[0xB8 + reg] = Some(OpcodeEntry::new(
            "MOV",
            Operation::Move,
            Rule::OpRegImm(Width::Dword),
            "MOV imm32",
        ));
        reg += 1;
    }

    // Shift/rotate
    table[0xC0] = Some(OpcodeEntry::group(Rule::Group2(ShiftCount::Imm8), "shift/rotate"));
    table[0xC1] = Some(OpcodeEntry::group(Rule::Group2(ShiftCount::Imm8), "shift/rotate"));
    table[0xD0] = Some(OpcodeEntry::group(Rule::Group2(ShiftCount::One), "shift/rotate"));
    table[0xD1] = Some(OpcodeEntry::group(Rule::Group2(ShiftCount::One), "shift/rotate"));
    table[0xD2] = Some(OpcodeEntry::group(Rule::Group2(ShiftCount::Cl), "shift/rotate"));
    table[0xD3] = Some(OpcodeEntry::group(Rule::Group2(ShiftCount::Cl), "shift/rotate"));

    table[0xC3] = Some(OpcodeEntry::new("RET", Operation::Return, Rule::Fixed, "RET"));

    // MOV r/m, imm
    table[0xC6] = Some(OpcodeEntry::new(
        "MOV",
        Operation::Move,
        Rule::RmImm(Width::Byte),
        "MOV r/m8, imm8",
    ));
    table[0xC7] = Some(OpcodeEntry::new(
        "MOV",
        Operation::Move,
        Rule::RmImm(Width::Dword),
        "MOV r/m32, imm32",
    ));

    table[0xCC] = Some(OpcodeEntry::new("INT3", Operation::Interrupt, Rule::Fixed, "INT3"));

    // LOOPcc/JECXZ rel8. Only LOOP prints its resolved target.
    table[0xE0] = Some(OpcodeEntry::new(
        "LOOPNZ",
        Operation::Loop,
        Rule::Rel(Width::Byte, RelativeDisplay::Displacement),
        "LOOPNZ",
    ));
    table[0xE1] = Some(OpcodeEntry::new(
        "LOOPZ",
        Operation::Loop,
        Rule::Rel(Width::Byte, RelativeDisplay::Displacement),
        "LOOPZ",
    ));
    table[0xE2] = Some(OpcodeEntry::new(
        "LOOP",
        Operation::Loop,
        Rule::Rel(Width::Byte, RelativeDisplay::Target),
        "LOOP",
    ));
    table[0xE3] = Some(OpcodeEntry::new(
        "JECXZ",
        Operation::ConditionalJump,
        Rule::Rel(Width::Byte, RelativeDisplay::Displacement),
        "JECXZ",
    ));

    // CALL/JMP rel
    table[0xE8] = Some(OpcodeEntry::new(
        "CALL",
        Operation::Call,
        Rule::Rel(Width::Dword, RelativeDisplay::Target),
        "CALL",
    ));
    table[0xE9] = Some(OpcodeEntry::new(
        "JMP",
        Operation::Jump,
        Rule::Rel(Width::Dword, RelativeDisplay::Target),
        "JMP",
    ));
    table[0xEB] = Some(OpcodeEntry::new(
        "JMP",
        Operation::Jump,
        Rule::Rel(Width::Byte, RelativeDisplay::Displacement),
        "JMP rel8",
    ));

    // Prefixes
    table[0xF0] = Some(OpcodeEntry::group(Rule::Prefix(Prefix::Lock), "LOCK"));
    table[0xF2] = Some(OpcodeEntry::group(Rule::Prefix(Prefix::Repnz), "REPNZ"));
    table[0xF3] = Some(OpcodeEntry::group(Rule::Prefix(Prefix::Rep), "REP instruction"));

    // Unary group
    table[0xF6] = Some(OpcodeEntry::group(Rule::Group3(Width::Byte), "MUL/IMUL/DIV/IDIV"));
    table[0xF7] = Some(OpcodeEntry::group(Rule::Group3(Width::Dword), "MUL/IMUL/DIV/IDIV"));

    table[0xFF] = Some(OpcodeEntry::group(Rule::Group5, "FF instruction"));

    table
};

/// Two-byte opcode table (0x0F xx).
pub static OPCODE_TABLE_0F: [Option<OpcodeEntry>; 256] = {
    let mut table: [Option<OpcodeEntry>; 256] = [NONE_ENTRY; 256];

    table[0xB6] = Some(OpcodeEntry::new(
        "MOVZX",
        Operation::MoveZeroExtend,
        Rule::Extend { byte_ptr: true },
        "0F instruction",
    ));
    table[0xB7] = Some(OpcodeEntry::new(
        "MOVZX",
        Operation::MoveZeroExtend,
        Rule::Extend { byte_ptr: false },
        "0F instruction",
    ));
    table[0xBE] = Some(OpcodeEntry::new(
        "MOVSX",
        Operation::MoveSignExtend,
        Rule::Extend { byte_ptr: true },
        "0F instruction",
    ));
    table[0xBF] = Some(OpcodeEntry::new(
        "MOVSX",
        Operation::MoveSignExtend,
        Rule::Extend { byte_ptr: false },
        "0F instruction",
    ));

    table
};

/// Looks up a primary opcode.
pub fn lookup(opcode: u8) -> Option<&'static OpcodeEntry> {
    OPCODE_TABLE[opcode as usize].as_ref()
}

/// Looks up the byte following a 0x0F escape.
pub fn lookup_0f(opcode: u8) -> Option<&'static OpcodeEntry> {
    OPCODE_TABLE_0F[opcode as usize].as_ref()
}
