//! Source file access for the loader: the filesystem boundary, version stamps,
//! immutable content snapshots, and path helpers.
//!
//! The [`FileSystem`] trait is the only way the rest of the workspace touches
//! the disk. [`OsFileSystem`] forwards to `std::fs`; [`MemoryFileSystem`] keeps
//! files in memory with a logical clock, which makes modification-time
//! behaviour deterministic.

#![warn(missing_docs)]

pub mod error;
pub mod fs;
pub mod memory_fs;
pub mod path;
pub mod snapshot;
pub mod stamp;

pub use error::SourceError;
pub use fs::{FileMetadata, FileSystem, OsFileSystem};
pub use memory_fs::MemoryFileSystem;
pub use path::{normalize, parent_directory, relative_to, to_slash};
pub use snapshot::Snapshot;
pub use stamp::VersionStamp;
