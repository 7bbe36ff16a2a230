//! 32-bit x86 instruction decoder.
//!
//! Covers a practical subset of the IA-32 integer instruction set:
//! - LOCK, REP and REPNZ prefixes, each reported as its own step
//! - ModR/M and SIB operand decoding with disp8/disp32
//! - A data-driven one-byte opcode table plus the MOVZX/MOVSX escape forms

mod decoder;
mod immediate;
pub mod modrm;
pub mod opcodes;
mod prefix;

pub use decoder::X86Disassembler;
pub use prefix::{rep_string_op, DispatchMode, Prefix, REP_STRING_OPS};
