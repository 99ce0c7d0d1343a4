//! Severity dispatch and fail-fast phase ordering.

use crate::diagnostic::Diagnostic;
use crate::phase::Phase;
use crate::reporter::DiagnosticReporter;
use crate::severity::Severity;

/// A phase reported at least one error, so the pipeline stops.
///
/// The per-diagnostic messages have already gone to the reporter; this value
/// carries only which phase failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{phase} phase reported {errors} error(s)")]
pub struct PhaseFailed {
    /// The phase that failed.
    pub phase: Phase,
    /// Number of error diagnostics in that phase. Zero when the phase was
    /// refused because an earlier one had already failed.
    pub errors: usize,
}

/// Dispatches diagnostics by severity and enforces fail-fast phase ordering.
///
/// One aggregator lives for one invocation. Once a phase fails, every later
/// [`check_phase`](Self::check_phase) call is refused without looking at its
/// diagnostics.
#[derive(Debug, Default)]
pub struct DiagnosticAggregator {
    failed: Option<Phase>,
    warnings: usize,
    errors: usize,
    infos: usize,
}

impl DiagnosticAggregator {
    /// Creates an aggregator with no phases checked.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forwards each diagnostic to its channel and returns whether any was an error.
    ///
    /// Warnings and errors go to `reporter`; informational items are logged
    /// through `tracing` only.
    pub fn dispatch<R, I>(&mut self, reporter: &mut R, diagnostics: I) -> bool
    where
        R: DiagnosticReporter + ?Sized,
        I: IntoIterator<Item = Diagnostic>,
    {
        let mut had_errors = false;
        for diag in diagnostics {
            match diag.severity {
                Severity::Warning => {
                    self.warnings += 1;
                    reporter.report_warning(diag.to_string());
                }
                Severity::Error => {
                    self.errors += 1;
                    had_errors = true;
                    reporter.report_error(diag.to_string());
                }
                Severity::Info => {
                    self.infos += 1;
                    tracing::info!(file = %diag.file_path.display(), "{}", diag.message);
                }
            }
        }
        had_errors
    }

    /// Checks one phase's diagnostics.
    ///
    /// Returns `Err` if the phase contained an error, or if an earlier phase
    /// already failed (in which case nothing is dispatched).
    pub fn check_phase<R, I>(
        &mut self,
        reporter: &mut R,
        phase: Phase,
        diagnostics: I,
    ) -> Result<(), PhaseFailed>
    where
        R: DiagnosticReporter + ?Sized,
        I: IntoIterator<Item = Diagnostic>,
    {
        if let Some(failed) = self.failed {
            tracing::debug!(%phase, %failed, "skipping phase after earlier failure");
            return Err(PhaseFailed { phase, errors: 0 });
        }
        let before = self.errors;
        if self.dispatch(reporter, diagnostics) {
            self.failed = Some(phase);
            return Err(PhaseFailed {
                phase,
                errors: self.errors - before,
            });
        }
        Ok(())
    }

    /// The phase that failed, if any.
    pub fn failed_phase(&self) -> Option<Phase> {
        self.failed
    }

    /// Number of warnings forwarded so far.
    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    /// Number of errors forwarded so far.
    pub fn error_count(&self) -> usize {
        self.errors
    }

    /// Number of informational diagnostics logged so far.
    pub fn info_count(&self) -> usize {
        self.infos
    }
}
