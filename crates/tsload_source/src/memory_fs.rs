//! An in-memory filesystem with a logical modification clock.

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::fs::{FileMetadata, FileSystem};

#[derive(Debug)]
struct MemoryFile {
    bytes: Vec<u8>,
    modified: SystemTime,
}

#[derive(Debug, Default)]
struct Inner {
    files: BTreeMap<PathBuf, MemoryFile>,
    clock: u64,
    reads: HashMap<PathBuf, usize>,
    stats: usize,
}

impl Inner {
    fn tick(&mut self) -> SystemTime {
        self.clock += 1;
        UNIX_EPOCH + Duration::from_secs(self.clock)
    }
}

/// A filesystem held entirely in memory.
///
/// Every [`write`](Self::write) or [`touch`](Self::touch) advances a logical
/// clock by one second and stamps the file with it, so modification times are
/// strictly increasing and never collide. Directories exist implicitly as the
/// ancestors of stored files. Reads and stats are counted so callers can
/// observe whether a cache actually went to "disk".
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    inner: Mutex<Inner>,
}

impl MemoryFileSystem {
    /// Creates an empty filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates or replaces a file, advancing its modification time.
    pub fn write(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        let mut inner = self.lock();
        let modified = inner.tick();
        inner.files.insert(
            path.into(),
            MemoryFile {
                bytes: content.into(),
                modified,
            },
        );
    }

    /// Advances a file's modification time without changing its content.
    ///
    /// Returns `false` if the file does not exist.
    pub fn touch(&self, path: &Path) -> bool {
        let mut inner = self.lock();
        let modified = inner.tick();
        match inner.files.get_mut(path) {
            Some(file) => {
                file.modified = modified;
                true
            }
            None => false,
        }
    }

    /// Deletes a file. Returns `false` if it did not exist.
    pub fn remove(&self, path: &Path) -> bool {
        self.lock().files.remove(path).is_some()
    }

    /// Number of times `path` has been read.
    pub fn read_count(&self, path: &Path) -> usize {
        self.lock().reads.get(path).copied().unwrap_or(0)
    }

    /// Total number of reads across all paths.
    pub fn total_reads(&self) -> usize {
        self.lock().reads.values().sum()
    }

    /// Total number of stat calls.
    pub fn stat_count(&self) -> usize {
        self.lock().stats
    }
}

impl FileSystem for MemoryFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let mut inner = self.lock();
        *inner.reads.entry(path.to_path_buf()).or_default() += 1;
        inner
            .files
            .get(path)
            .map(|f| f.bytes.clone())
            .ok_or_else(|| not_found(path))
    }

    fn stat(&self, path: &Path) -> io::Result<FileMetadata> {
        let mut inner = self.lock();
        inner.stats += 1;
        if let Some(file) = inner.files.get(path) {
            return Ok(FileMetadata {
                modified: file.modified,
                is_directory: false,
            });
        }
        if inner.files.keys().any(|f| f.starts_with(path) && f != path) {
            return Ok(FileMetadata {
                modified: UNIX_EPOCH,
                is_directory: true,
            });
        }
        Err(not_found(path))
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} does not exist", path.display()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read() {
        let fs = MemoryFileSystem::new();
        fs.write("/src/a.ts", "var a;");
        assert_eq!(fs.read(Path::new("/src/a.ts")).unwrap(), b"var a;");
        assert_eq!(fs.read_count(Path::new("/src/a.ts")), 1);
    }

    #[test]
    fn every_write_advances_mtime() {
        let fs = MemoryFileSystem::new();
        let path = Path::new("/a.ts");
        fs.write(path, "1");
        let first = fs.stat(path).unwrap().modified;
        fs.write(path, "1");
        let second = fs.stat(path).unwrap().modified;
        assert!(second > first);
    }

    #[test]
    fn touch_keeps_content() {
        let fs = MemoryFileSystem::new();
        let path = Path::new("/a.ts");
        fs.write(path, "same");
        let before = fs.stat(path).unwrap().modified;
        assert!(fs.touch(path));
        assert!(fs.stat(path).unwrap().modified > before);
        assert_eq!(fs.read(path).unwrap(), b"same");
        assert!(!fs.touch(Path::new("/missing.ts")));
    }

    #[test]
    fn directories_are_implicit() {
        let fs = MemoryFileSystem::new();
        fs.write("/project/src/a.ts", "");
        assert!(fs.is_directory(Path::new("/project/src")));
        assert!(fs.is_directory(Path::new("/project")));
        assert!(!fs.is_directory(Path::new("/project/src/a.ts")));
        assert!(!fs.exists(Path::new("/other")));
    }

    #[test]
    fn remove_makes_file_missing() {
        let fs = MemoryFileSystem::new();
        fs.write("/a.ts", "x");
        assert!(fs.remove(Path::new("/a.ts")));
        assert!(fs.read(Path::new("/a.ts")).is_err());
        assert!(!fs.remove(Path::new("/a.ts")));
    }

    #[test]
    fn stats_are_counted() {
        let fs = MemoryFileSystem::new();
        fs.write("/a.ts", "x");
        let _ = fs.stat(Path::new("/a.ts"));
        let _ = fs.exists(Path::new("/b.ts"));
        assert_eq!(fs.stat_count(), 2);
        assert_eq!(fs.total_reads(), 0);
    }
}
