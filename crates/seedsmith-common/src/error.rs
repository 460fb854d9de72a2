//! Error types for seedsmith-common.

use thiserror::Error;

/// Common error type for seedsmith operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer at offset {offset}: needed {needed} bytes but only {available} available")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A 7-bit encoded integer did not terminate within 5 bytes.
    #[error("7-bit encoded integer at offset {offset} is longer than 5 bytes")]
    VarIntTooLong { offset: usize },

    /// A 7-bit encoded integer does not fit in 32 bits.
    #[error("7-bit encoded integer at offset {offset} overflows 32 bits")]
    VarIntOverflow { offset: usize },
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
