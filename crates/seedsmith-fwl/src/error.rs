//! Error types for world descriptor parsing and patching.

use thiserror::Error;

/// Errors that can occur when reading or patching a world descriptor.
#[derive(Debug, Error)]
pub enum Error {
    /// The descriptor could not be walked: truncated field, bad length, or
    /// a read past the end of the buffer.
    #[error("malformed descriptor: {0}")]
    Malformed(#[from] seedsmith_common::Error),

    /// No candidate checksum matched the current seed inside the scan window.
    #[error(
        "could not locate seed checksum ({algorithms}) within {window} bytes of offset {start}: unrecognized structure"
    )]
    ChecksumNotFound {
        algorithms: String,
        start: usize,
        window: usize,
    },

    /// The target seed cannot be length-prefixed.
    #[error("seed of {0} bytes is too long to encode")]
    SeedTooLong(usize),
}

impl Error {
    /// Whether this error means the file layout was not understood.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Malformed(_) | Self::ChecksumNotFound { .. })
    }
}

/// Result type for descriptor operations.
pub type Result<T> = std::result::Result<T, Error>;
