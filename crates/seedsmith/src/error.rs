//! Error types for seed synchronisation.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while synchronising a world's seed.
#[derive(Debug, Error)]
pub enum Error {
    /// Descriptor parsing or patching error.
    #[error("{0}")]
    Fwl(#[from] seedsmith_fwl::Error),

    /// I/O error on a specific file.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backup file pattern could not be built.
    #[error("invalid backup pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

impl Error {
    /// Whether the descriptor layout was not understood.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Fwl(e) if e.is_structural())
    }

    pub(crate) fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for seed synchronisation.
pub type Result<T> = std::result::Result<T, Error>;
