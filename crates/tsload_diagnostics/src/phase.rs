//! The checking phases, in the order they run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A diagnostic-producing phase of one invocation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Phase {
    /// Reference and import resolution.
    Resolution,
    /// Per-file syntax checking.
    Syntax,
    /// Per-file type checking.
    Semantic,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Resolution => write!(f, "resolution"),
            Phase::Syntax => write!(f, "syntax"),
            Phase::Semantic => write!(f, "semantic"),
        }
    }
}
