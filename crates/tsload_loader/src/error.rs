//! Errors surfaced by a loader invocation.

use tsload_common::InternalError;
use tsload_diagnostics::Phase;
use tsload_emit::OutputError;
use tsload_session::EmitFailure;
use tsload_source::SourceError;

/// Why an invocation did not produce output.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// A checked phase reported an error. The individual diagnostics were
    /// already sent to the host; this message deliberately repeats none of them.
    #[error("Failed during compilation")]
    CompilationFailed {
        /// The phase that stopped the pipeline.
        phase: Phase,
    },

    /// A file in the dependency graph could not be read.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The engine could not resolve a path while emitting.
    #[error(transparent)]
    Emit(#[from] EmitFailure),

    /// The emit result could not be packaged.
    #[error(transparent)]
    Output(#[from] OutputError),

    /// The engine broke its contract.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl From<tsload_diagnostics::PhaseFailed> for LoaderError {
    fn from(failed: tsload_diagnostics::PhaseFailed) -> Self {
        LoaderError::CompilationFailed {
            phase: failed.phase,
        }
    }
}

impl LoaderError {
    /// Returns `true` for an ordinary compilation failure, as opposed to a fault.
    pub fn is_compilation_failure(&self) -> bool {
        matches!(self, LoaderError::CompilationFailed { .. })
    }
}
