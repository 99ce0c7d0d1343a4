//! Errors that indicate a broken contract between components.

/// A contract violation: a collaborator returned something it promised never
/// to return. Never caused by the user's source files.
#[derive(Debug, thiserror::Error)]
#[error("internal loader error: {message}")]
pub struct InternalError {
    /// What went wrong.
    pub message: String,
}

impl InternalError {
    /// Creates an internal error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
