//! Built-in sample program.

/// A short program touching most instruction categories the decoder knows:
/// register and immediate moves, arithmetic, MUL, CALL/JE/JMP, the 0xFF
/// group, MOVZX/MOVSX, REP MOVSB, XCHG, SHL, LOOP and RET.
pub const SAMPLE_PROGRAM: [u8; 55] = [
    0x90, // NOP
    0xB8, 0x78, 0x56, 0x34, 0x12, // MOV EAX, 0x12345678
    0xB9, 0xEF, 0xCD, 0xAB, 0x90, // MOV ECX, 0x90abcdef
    0x03, 0xC1, // ADD EAX, ECX
    0x83, 0xE8, 0x05, // SUB EAX, 0x05
    0x89, 0xC3, // MOV EBX, EAX
    0x01, 0xCB, // ADD EBX, ECX
    0x29, 0xC3, // SUB EBX, EAX
    0xF7, 0xE3, // MUL EBX
    0xE8, 0x12, 0x34, 0x56, 0x78, // CALL rel32
    0x74, 0x05, // JE/Z rel8
    0xE9, 0x78, 0x56, 0x34, 0x12, // JMP rel32
    0xFF, 0xC0, // INC EAX
    0xFF, 0xC8, // DEC EAX
    0x0F, 0xB6, 0xC0, // MOVZX EAX, BYTE PTR EAX
    0x0F, 0xBE, 0xC0, // MOVSX EAX, BYTE PTR EAX
    0xF3, 0xA4, // REP MOVSB
    0x86, 0xC1, // XCHG ECX, EAX
    0xD1, 0xE0, // SHL EAX, 1
    0xE2, 0xFE, // LOOP to itself
    0xC3, // RET
];

/// The listing of [`SAMPLE_PROGRAM`].
pub const SAMPLE_LISTING: &str = "\
0000: NOP
0001: MOV EAX, 0x12345678
0006: MOV ECX, 0x90abcdef
000b: ADD EAX, ECX
000d: SUB EAX, 0x05
0010: MOV EBX, EAX
0012: ADD EBX, ECX
0014: SUB EBX, EAX
0016: MUL EBX
0018: CALL 0x7856342f
001d: JE/Z 0x05
001f: JMP 0x1234569c
0024: INC EAX
0026: DEC EAX
0028: MOVZX EAX, BYTE PTR EAX
002b: MOVSX EAX, BYTE PTR EAX
002e: REP
002f: MOVSB
0030: XCHG ECX, EAX
0032: SHL EAX, 1
0034: LOOP 0x34
0036: RET
";
