//! Whole-listing tests against known output.

use disforge_disasm::demo::{SAMPLE_LISTING, SAMPLE_PROGRAM};
use disforge_disasm::{disassemble, Field, Line, Listing, ListingConfig};

fn lines(bytes: &[u8]) -> Vec<String> {
    disassemble(bytes).iter().map(ToString::to_string).collect()
}

#[test]
fn test_nop_mov_ret() {
    assert_eq!(
        lines(&[0x90, 0xB8, 0x78, 0x56, 0x34, 0x12, 0xC3]),
        vec!["0000: NOP", "0001: MOV EAX, 0x12345678", "0006: RET"]
    );
}

#[test]
fn test_add_reg_reg() {
    assert_eq!(lines(&[0x03, 0xC1]), vec!["0000: ADD EAX, ECX"]);
}

#[test]
fn test_sub_imm8() {
    assert_eq!(lines(&[0x83, 0xE8, 0x05]), vec!["0000: SUB EAX, 0x05"]);
}

#[test]
fn test_lone_mov_imm32_opcode() {
    let listing = disassemble(&[0xB8]);
    assert!(listing.truncated);
    assert_eq!(listing.len(), 1);
    assert_eq!(listing.to_string(), "0000: Incomplete MOV imm32\n");
}

#[test]
fn test_rep_movsb() {
    assert_eq!(lines(&[0xF3, 0xA4]), vec!["0000: REP", "0001: MOVSB"]);
}

#[test]
fn test_sample_program() {
    let listing = disassemble(&SAMPLE_PROGRAM);
    assert!(!listing.truncated);
    assert_eq!(listing.consumed, SAMPLE_PROGRAM.len());
    assert_eq!(listing.to_string(), SAMPLE_LISTING);
}

#[test]
fn test_sample_program_rebased() {
    let config = ListingConfig::default().with_origin(0x1000);
    let listing = Listing::with_config(&SAMPLE_PROGRAM, config);
    let text = listing.to_string();
    assert!(text.starts_with("1000: NOP\n1001: MOV EAX, 0x12345678\n"));
    // rel32 targets resolve in the rebased address space
    assert!(text.contains("1018: CALL 0x7856442f\n"));
    assert!(text.contains("1034: LOOP 0x34\n"));
    assert!(text.ends_with("1036: RET\n"));
}

#[test]
fn test_truncation_after_valid_prefix_of_input() {
    // MOV EAX, [disp32] with only two displacement bytes
    let listing = disassemble(&[0x90, 0x8B, 0x05, 0x00, 0x10]);
    assert_eq!(
        listing.iter().map(ToString::to_string).collect::<Vec<_>>(),
        vec!["0000: NOP", "0001: Incomplete MOV instruction (disp32)"]
    );
    assert_eq!(listing.consumed, 1);
}

#[test]
fn test_truncation_stops_pass() {
    // The NOP after the short CALL is never reached
    let listing = disassemble(&[0xE8, 0x01, 0x02]);
    assert_eq!(listing.len(), 1);
    assert!(matches!(
        &listing.lines[0],
        Line::Truncated { message, .. } if message == "Incomplete CALL"
    ));
}

#[test]
fn test_unknown_markers_are_recoverable() {
    assert_eq!(
        lines(&[0x06, 0x0F, 0x0B, 0xFF, 0xF8, 0x90]),
        vec![
            "0000: Unknown instruction: 0x06",
            "0001: Unknown 0F instruction",
            // 0x0B reads 0xFF as its ModR/M byte
            "0002: OR EDI, EDI",
            "0004: Unknown instruction: 0xf8",
            "0005: NOP",
        ]
    );
}

#[test]
fn test_unknown_ff_skips_modrm() {
    assert_eq!(
        lines(&[0xFF, 0xF0, 0xC3]),
        vec!["0000: Unknown FF instruction", "0002: RET"]
    );
}

#[test]
fn test_prefix_lines() {
    assert_eq!(
        lines(&[0xF0, 0xFF, 0x00, 0xF2, 0xAE, 0xF3, 0xA5]),
        vec![
            "0000: LOCK",
            "0001: INC [EAX]",
            "0003: REPNZ",
            "0004: SCASB",
            "0005: REP",
            "0006: MOVSD",
        ]
    );
}

#[test]
fn test_repnz_then_modrm_instruction() {
    assert_eq!(
        lines(&[0xF2, 0x8B, 0x45, 0x08, 0xF2, 0xA7]),
        vec!["0000: REPNZ", "0001: MOV EAX, [EBP + 0x8]", "0004: REPNZ", "0005: CMPSD"]
    );
}

#[test]
fn test_rep_only_accepts_string_moves() {
    assert_eq!(
        lines(&[0xF3, 0xAB, 0xF3, 0xF3, 0xA4]),
        vec![
            "0000: REP",
            "0001: Unknown REP instruction",
            "0002: REP",
            "0003: Unknown REP instruction",
            "0004: MOVSB",
        ]
    );
}

#[test]
fn test_memory_forms() {
    assert_eq!(
        lines(&[
            0x8B, 0x04, 0x8D, 0x00, 0x20, 0x00, 0x00, // MOV EAX, [ECX*4 + 0x2000]
            0x89, 0x44, 0x24, 0x08, // MOV [ESP + 0x8], EAX
            0x8B, 0x40, 0x00, // MOV EAX, [EAX + 0x0]
            0x8B, 0x05, 0xF0, 0xFF, 0xFF, 0xFF, // MOV EAX, [-0x10]
        ]),
        vec![
            "0000: MOV EAX, [ECX*4 + 0x2000]",
            "0007: MOV [ESP + 0x8], EAX",
            "000b: MOV EAX, [EAX + 0x0]",
            "000e: MOV EAX, [-0x10]",
        ]
    );
}

#[test]
fn test_branch_rendering() {
    assert_eq!(
        lines(&[0x75, 0xFE, 0xEB, 0x00, 0xE2, 0xFA, 0xE9, 0x00, 0x00, 0x00, 0x00]),
        vec![
            "0000: JNE/NZ 0xfe",
            "0002: JMP 0x00",
            "0004: LOOP 0x00",
            "0006: JMP 0x0000000b",
        ]
    );
}

#[test]
fn test_limit_is_not_truncation() {
    let listing = Listing::with_config(&SAMPLE_PROGRAM, ListingConfig::default().with_limit(3));
    assert_eq!(listing.len(), 3);
    assert!(!listing.truncated);
    assert_eq!(listing.consumed, 11);
}

#[test]
fn test_truncated_line_reports_field() {
    let listing = disassemble(&[0x8B, 0x04]);
    let Some(Line::Truncated { offset, message }) = listing.lines.last() else {
        panic!("expected a truncation marker");
    };
    assert_eq!(*offset, 0);
    assert_eq!(message, &format!("Incomplete MOV instruction ({})", Field::Sib.name()));
}
