//! A single compiler diagnostic.

use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A compiler message attached to a source location.
///
/// `line` and `column` are zero-based, as the compiler engine reports them.
/// The [`Display`](fmt::Display) form is the one the host sees:
/// `<file>(<line>,<col>) <message>` with one-based coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The file the diagnostic refers to.
    pub file_path: PathBuf,
    /// Zero-based line.
    pub line: u32,
    /// Zero-based column.
    pub column: u32,
    /// The message text.
    pub message: String,
    /// How serious the diagnostic is.
    pub severity: Severity,
}

impl Diagnostic {
    /// Creates a diagnostic with an explicit severity.
    pub fn new(
        severity: Severity,
        file_path: impl Into<PathBuf>,
        line: u32,
        column: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            column,
            message: message.into(),
            severity,
        }
    }

    /// Creates an error diagnostic.
    pub fn error(file_path: impl Into<PathBuf>, line: u32, column: u32, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, file_path, line, column, message)
    }

    /// Creates a warning diagnostic.
    pub fn warning(file_path: impl Into<PathBuf>, line: u32, column: u32, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, file_path, line, column, message)
    }

    /// Creates an informational diagnostic.
    pub fn info(file_path: impl Into<PathBuf>, line: u32, column: u32, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, file_path, line, column, message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({},{}) {}",
            self.file_path.display(),
            u64::from(self.line) + 1,
            u64::from(self.column) + 1,
            self.message
        )
    }
}
