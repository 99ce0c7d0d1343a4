//! Incremental caching for the loader.
//!
//! [`SnapshotStore`] caches file content across invocations and revalidates
//! it against the filesystem. [`DependencyTracker`] uses the store's stamps to
//! decide whether the compiler session already holds the current version of a
//! file, so unchanged files are never handed to the engine twice. Whether a
//! cached entry is stale is decided by one pluggable [`InvalidationPolicy`].

#![warn(missing_docs)]

pub mod policy;
pub mod store;
pub mod tracker;

pub use policy::{AlwaysTrustCache, CacheMode, CheckModificationTime, InvalidationPolicy};
pub use store::{SnapshotStore, StoreStats};
pub use tracker::{DependencyTracker, RegistrationOutcome, RegistrationSummary};
