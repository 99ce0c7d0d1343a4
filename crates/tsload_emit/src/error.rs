//! Errors from reshaping emit output.

use tsload_session::ArtifactKind;

/// The emit result did not have the expected shape.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// No code artifact was produced.
    #[error("emit produced no code artifact")]
    MissingCode,

    /// More than one artifact of a kind the loader consumes.
    #[error("emit produced more than one {kind:?} artifact")]
    DuplicateArtifact {
        /// The duplicated kind.
        kind: ArtifactKind,
    },

    /// The source map artifact is not a valid source map.
    #[error("malformed source map: {reason}")]
    MalformedSourceMap {
        /// Parser message.
        reason: String,
    },
}
