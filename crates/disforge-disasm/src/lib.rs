//! # disforge-disasm
//!
//! 32-bit x86 instruction decoder and listing pass.
//!
//! ```
//! use disforge_disasm::disassemble;
//!
//! let listing = disassemble(&[0x90, 0xB8, 0x78, 0x56, 0x34, 0x12, 0xC3]);
//! assert_eq!(
//!     listing.to_string(),
//!     "0000: NOP\n0001: MOV EAX, 0x12345678\n0006: RET\n"
//! );
//! ```

pub mod cursor;
pub mod demo;
pub mod error;
pub mod listing;
pub mod traits;
pub mod x86;

pub use cursor::{ByteCursor, OutOfBytes};
pub use error::{DecodeError, Field};
pub use listing::{disassemble, Line, Listing, ListingConfig};
pub use traits::{Decoded, Disassembler, PrefixMarker};
pub use x86::{DispatchMode, Prefix, X86Disassembler};
