//! Lexical path helpers.
//!
//! None of these touch the filesystem; symlinks are not resolved.

use std::path::{Component, Path, PathBuf};

/// Lexically normalizes a path, dropping `.` and folding `..` into its parent.
///
/// A `..` that would climb above a relative path's start is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}

/// Returns the directory containing `path`, or `None` when `path` is a root
/// or has no parent component.
pub fn parent_directory(path: &Path) -> Option<PathBuf> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Some(parent.to_path_buf()),
        _ => None,
    }
}

/// Computes `path` relative to `base`, inserting `..` where `base` is deeper.
///
/// Both paths are normalized first. If they share no common root (different
/// prefixes on Windows, or one absolute and one relative) `path` is returned
/// normalized but otherwise unchanged.
pub fn relative_to(base: &Path, path: &Path) -> PathBuf {
    let base = normalize(base);
    let path = normalize(path);
    if base.is_absolute() != path.is_absolute() {
        return path;
    }

    let base_parts: Vec<_> = base.components().collect();
    let path_parts: Vec<_> = path.components().collect();
    let common = base_parts
        .iter()
        .zip(&path_parts)
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 && base.is_absolute() {
        return path;
    }

    let mut rel = PathBuf::new();
    for _ in common..base_parts.len() {
        rel.push("..");
    }
    for part in &path_parts[common..] {
        rel.push(part.as_os_str());
    }
    rel
}

/// Renders a path with `/` separators, as source maps expect.
pub fn to_slash(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::RootDir => out.push('/'),
            other => {
                if !out.is_empty() && !out.ends_with('/') {
                    out.push('/');
                }
                out.push_str(&other.as_os_str().to_string_lossy());
            }
        }
    }
    out
}
