//! Error types for disforge-core.

use thiserror::Error;

/// Core error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A register code did not fit the 3-bit register field.
    #[error("register code {0} is out of range (expected 0..8)")]
    RegisterOutOfRange(u8),
}
