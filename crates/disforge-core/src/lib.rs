//! # disforge-core
//!
//! Core value types for the disforge 32-bit x86 disassembler: registers,
//! operands, decoded instructions, and the fixed name tables used when
//! rendering them as listing text.

pub mod error;
pub mod instruction;
pub mod operand;
pub mod register;

pub use error::Error;
pub use instruction::{Condition, Instruction, Operation, CONDITION_NAMES};
pub use operand::{Immediate, MemoryRef, Operand, Relative, RelativeDisplay};
pub use register::{Register, RegisterWidth};
