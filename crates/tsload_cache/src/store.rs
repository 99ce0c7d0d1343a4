//! The file-snapshot cache.
//!
//! One store lives for the whole host process (or one per isolated worker)
//! and serves every invocation. It is deliberately unsynchronized: the host
//! must not run two invocations against the same store at once.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tsload_session::ResolverHost;
use tsload_source::{FileSystem, Snapshot, SourceError, VersionStamp};

use crate::policy::{CacheMode, CheckModificationTime, InvalidationPolicy};

/// Hit/miss counters, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Snapshots served from the cache.
    pub hits: usize,
    /// Snapshots read fresh from the filesystem.
    pub misses: usize,
}

/// Caches immutable file snapshots keyed by path.
///
/// [`get_snapshot`](Self::get_snapshot) stats the file and serves the cached
/// snapshot when the [`InvalidationPolicy`] says it is still current;
/// otherwise it reads the file, replaces the cache entry, and returns the new
/// snapshot. In [`CacheMode::Disabled`] every call reads fresh.
pub struct SnapshotStore<F> {
    fs: F,
    policy: Box<dyn InvalidationPolicy>,
    mode: CacheMode,
    snapshots: HashMap<PathBuf, Snapshot>,
    stats: StoreStats,
}

impl<F: FileSystem> SnapshotStore<F> {
    /// Creates an empty store using modification-time invalidation.
    pub fn new(fs: F) -> Self {
        Self::with_policy(fs, Box::new(CheckModificationTime))
    }

    /// Creates an empty store with an explicit invalidation policy.
    pub fn with_policy(fs: F, policy: Box<dyn InvalidationPolicy>) -> Self {
        Self {
            fs,
            policy,
            mode: CacheMode::Enabled,
            snapshots: HashMap::new(),
            stats: StoreStats::default(),
        }
    }

    /// Sets whether the current invocation may reuse cached snapshots.
    pub fn set_mode(&mut self, mode: CacheMode) {
        self.mode = mode;
    }

    /// The current cache mode.
    pub fn mode(&self) -> CacheMode {
        self.mode
    }

    /// Stats `path` and returns its current version stamp.
    pub fn current_stamp(&self, path: &Path) -> Result<VersionStamp, SourceError> {
        let meta = self.fs.stat(path).map_err(|e| SourceError::io(path, e))?;
        Ok(VersionStamp::from_modified(meta.modified))
    }

    /// Returns the current snapshot of `path`.
    pub fn get_snapshot(&mut self, path: &Path) -> Result<Snapshot, SourceError> {
        let stamp = self.current_stamp(path)?;
        self.snapshot_at(path, stamp)
    }

    /// Returns the snapshot for `path` given a stamp the caller just took.
    pub(crate) fn snapshot_at(&mut self, path: &Path, stamp: VersionStamp) -> Result<Snapshot, SourceError> {
        if self.mode.is_enabled() {
            if let Some(cached) = self.snapshots.get(path) {
                if !self.policy.should_invalidate(path, cached.stamp(), stamp) {
                    self.stats.hits += 1;
                    tracing::trace!(path = %path.display(), "snapshot cache hit");
                    return Ok(cached.clone());
                }
            }
        }

        let snapshot = Snapshot::read(&self.fs, path, stamp)?;
        self.stats.misses += 1;
        tracing::debug!(
            path = %path.display(),
            stamp = %stamp,
            mode = ?self.mode,
            "read fresh snapshot"
        );
        self.snapshots.insert(path.to_path_buf(), snapshot.clone());
        Ok(snapshot)
    }

    /// Returns `true` if state captured at `cached` is still current for a
    /// file now at `current`.
    pub fn is_current(&self, path: &Path, cached: VersionStamp, current: VersionStamp) -> bool {
        self.mode.is_enabled() && !self.policy.should_invalidate(path, cached, current)
    }

    /// The cached snapshot for `path`, without touching the filesystem.
    pub fn cached(&self, path: &Path) -> Option<&Snapshot> {
        self.snapshots.get(path)
    }

    /// Drops the cached snapshot for `path`.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.snapshots.remove(path).is_some()
    }

    /// Drops every cached snapshot and resets the counters.
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.stats = StoreStats::default();
    }

    /// Number of cached snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Hit/miss counters since creation or the last [`clear`](Self::clear).
    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    /// The underlying filesystem.
    pub fn fs(&self) -> &F {
        &self.fs
    }
}

impl<F: FileSystem> ResolverHost for SnapshotStore<F> {
    fn snapshot(&mut self, path: &Path) -> Result<Snapshot, SourceError> {
        self.get_snapshot(path)
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.fs.exists(path)
    }

    fn directory_exists(&self, path: &Path) -> bool {
        self.fs.is_directory(path)
    }

    fn parent_directory(&self, path: &Path) -> Option<PathBuf> {
        self.fs.parent_directory(path)
    }
}
