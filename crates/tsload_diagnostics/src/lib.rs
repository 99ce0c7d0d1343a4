//! Compiler diagnostics and the fail-fast policy that reports them.
//!
//! Diagnostics arrive from three [`Phase`]s in a fixed order. The
//! [`DiagnosticAggregator`] forwards warnings and errors to the host through a
//! [`DiagnosticReporter`], sends informational items to the `tracing` log, and
//! stops the pipeline at the first phase that reported an error.

#![warn(missing_docs)]

pub mod aggregator;
pub mod diagnostic;
pub mod phase;
pub mod reporter;
pub mod severity;

pub use aggregator::{DiagnosticAggregator, PhaseFailed};
pub use diagnostic::Diagnostic;
pub use phase::Phase;
pub use reporter::{CollectingReporter, DiagnosticReporter};
pub use severity::Severity;
