//! The filesystem boundary.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::path::parent_directory;

/// Metadata the loader needs from a `stat` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileMetadata {
    /// Last modification time.
    pub modified: SystemTime,
    /// Whether the path names a directory.
    pub is_directory: bool,
}

/// Read-only view of a filesystem.
///
/// All disk access made by the snapshot cache and the resolver host goes
/// through this trait, so a host can substitute a virtual filesystem.
pub trait FileSystem {
    /// Reads the full contents of a file.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Returns the modification time and kind of a path.
    fn stat(&self, path: &Path) -> io::Result<FileMetadata>;

    /// Returns `true` if anything exists at `path`.
    fn exists(&self, path: &Path) -> bool {
        self.stat(path).is_ok()
    }

    /// Returns `true` if `path` exists and is a directory.
    fn is_directory(&self, path: &Path) -> bool {
        self.stat(path).map(|m| m.is_directory).unwrap_or(false)
    }

    /// Returns the parent directory, or `None` at the root.
    fn parent_directory(&self, path: &Path) -> Option<PathBuf> {
        parent_directory(path)
    }
}

/// The real filesystem, via `std::fs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn stat(&self, path: &Path) -> io::Result<FileMetadata> {
        let meta = std::fs::metadata(path)?;
        Ok(FileMetadata {
            modified: meta.modified()?,
            is_directory: meta.is_dir(),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        (**self).read(path)
    }

    fn stat(&self, path: &Path) -> io::Result<FileMetadata> {
        (**self).stat(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn is_directory(&self, path: &Path) -> bool {
        (**self).is_directory(path)
    }

    fn parent_directory(&self, path: &Path) -> Option<PathBuf> {
        (**self).parent_directory(path)
    }
}

impl<T: FileSystem + ?Sized> FileSystem for Arc<T> {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        (**self).read(path)
    }

    fn stat(&self, path: &Path) -> io::Result<FileMetadata> {
        (**self).stat(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn is_directory(&self, path: &Path) -> bool {
        (**self).is_directory(path)
    }

    fn parent_directory(&self, path: &Path) -> Option<PathBuf> {
        (**self).parent_directory(path)
    }
}
