//! Version stamps used to decide whether cached state is stale.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A comparable file version, taken from the filesystem modification time.
///
/// Equal stamps mean "same version as far as the cache is concerned". Stamps
/// are only ever compared for equality by the invalidation logic; ordering is
/// provided for logging and tests.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionStamp(SystemTime);

impl VersionStamp {
    /// Creates a stamp from a modification time.
    pub fn from_modified(modified: SystemTime) -> Self {
        Self(modified)
    }

    /// Returns the modification time this stamp was taken from.
    pub fn modified(self) -> SystemTime {
        self.0
    }
}

impl fmt::Debug for VersionStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VersionStamp({self})")
    }
}

impl fmt::Display for VersionStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.duration_since(UNIX_EPOCH) {
            Ok(d) => write!(f, "{}.{:09}", d.as_secs(), d.subsec_nanos()),
            Err(_) => write!(f, "pre-epoch"),
        }
    }
}
