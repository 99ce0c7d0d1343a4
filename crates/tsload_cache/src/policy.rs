//! Staleness policies shared by the snapshot store and the dependency tracker.

use std::fmt;
use std::path::Path;

use tsload_source::VersionStamp;

/// Decides whether cached state for a path must be discarded.
///
/// `cached` is the stamp the cached snapshot or registration was taken at;
/// `current` is the stamp the filesystem reports now.
pub trait InvalidationPolicy: fmt::Debug {
    /// Returns `true` if the cached entry for `path` is stale.
    fn should_invalidate(&self, path: &Path, cached: VersionStamp, current: VersionStamp) -> bool;
}

/// Invalidate whenever the modification time differs from the cached one.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckModificationTime;

impl InvalidationPolicy for CheckModificationTime {
    fn should_invalidate(&self, _path: &Path, cached: VersionStamp, current: VersionStamp) -> bool {
        cached != current
    }
}

/// Never invalidate: an entry, once cached, is served for the life of the
/// process. Only a cache-disabled invocation or an explicit reset refreshes it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysTrustCache;

impl InvalidationPolicy for AlwaysTrustCache {
    fn should_invalidate(&self, _path: &Path, _cached: VersionStamp, _current: VersionStamp) -> bool {
        false
    }
}

/// Whether the current invocation may reuse cached state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Reuse cached state subject to the invalidation policy.
    #[default]
    Enabled,
    /// Treat everything as stale: always re-read and re-register.
    Disabled,
}

impl CacheMode {
    /// `Enabled` if `enabled`, else `Disabled`.
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            CacheMode::Enabled
        } else {
            CacheMode::Disabled
        }
    }

    /// Returns `true` for [`CacheMode::Enabled`].
    pub fn is_enabled(self) -> bool {
        self == CacheMode::Enabled
    }
}
