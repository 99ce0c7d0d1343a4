//! Error types for reading source files.

use std::path::PathBuf;

/// Errors raised while stat-ing or reading a source file.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The file could not be stat-ed or read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file's bytes are not valid UTF-8.
    #[error("{path} is not valid UTF-8")]
    InvalidUtf8 {
        /// The offending file.
        path: PathBuf,
    },
}

impl SourceError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
