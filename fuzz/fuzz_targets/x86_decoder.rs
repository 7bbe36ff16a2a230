#![no_main]

use disforge_disasm::{ByteCursor, Disassembler, DispatchMode, X86Disassembler};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let disasm = X86Disassembler::new();

    // Single step from offset 0x1000, should never panic
    let _ = disasm.decode_instruction(data, 0x1000);

    // Step through the buffer in both dispatch modes
    for mode in [DispatchMode::Any, DispatchMode::RepString] {
        let mut cursor = ByteCursor::with_origin(data, 0x1000);
        while !cursor.is_empty() {
            let before = cursor.position();
            match disasm.decode_step(&mut cursor, mode) {
                Ok(decoded) => {
                    assert!(decoded.size() >= 1);
                    assert!(decoded.size() <= disasm.max_instruction_size());
                    assert_eq!(cursor.position() - before, decoded.size());
                }
                Err(err) if err.is_fatal() => break,
                Err(_) => assert!(cursor.position() > before),
            }
        }
    }
});
