//! The host's warning and error channels.

/// Receives formatted diagnostics on behalf of the host.
///
/// Messages arrive already formatted (see [`Diagnostic`](crate::Diagnostic)'s
/// `Display`). Informational diagnostics never reach a reporter.
pub trait DiagnosticReporter {
    /// Reports a warning.
    fn report_warning(&mut self, message: String);

    /// Reports an error.
    fn report_error(&mut self, message: String);
}

/// A reporter that keeps every message it receives, in order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollectingReporter {
    /// Warning messages, in arrival order.
    pub warnings: Vec<String>,
    /// Error messages, in arrival order.
    pub errors: Vec<String>,
}

impl CollectingReporter {
    /// Creates an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if any error was reported.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Takes all collected messages, leaving the reporter empty.
    pub fn take(&mut self) -> (Vec<String>, Vec<String>) {
        (
            std::mem::take(&mut self.warnings),
            std::mem::take(&mut self.errors),
        )
    }
}

impl DiagnosticReporter for CollectingReporter {
    fn report_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    fn report_error(&mut self, message: String) {
        self.errors.push(message);
    }
}
