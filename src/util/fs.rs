//! Filesystem utilities.
//!
//! Artifact search lives here as well: native add-ons are located by walking a
//! directory tree for files with the `.node` extension.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// File extension of a compiled native add-on.
pub const NATIVE_EXTENSION: &str = "node";

/// Search `root` recursively for files whose extension equals `extension`.
///
/// A missing root yields an empty result; callers decide whether that is an
/// error. Entries are visited depth-first with siblings sorted by file name, so
/// the order is stable for a given filesystem state.
pub fn search(root: &Path, extension: &str) -> Vec<PathBuf> {
    search_by(root, |path| {
        path.extension().is_some_and(|ext| ext == extension)
    })
}

/// Search `root` recursively for files accepted by `predicate`.
pub fn search_by<F>(root: &Path, predicate: F) -> Vec<PathBuf>
where
    F: Fn(&Path) -> bool,
{
    if !root.is_dir() {
        return Vec::new();
    }

    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| predicate(path))
        .collect()
}

/// Return the first file under `root` with the given extension.
///
/// When a directory holds several matching binaries this picks whichever sorts
/// first in [`search`] order. It is a heuristic, not a lookup of "the"
/// canonical artifact.
pub fn first_match(root: &Path, extension: &str) -> Option<PathBuf> {
    search(root, extension).into_iter().next()
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Copy a file, overwriting the destination if it exists.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    fs::copy(src, dst)
        .with_context(|| format!("failed to copy {} to {}", src.display(), dst.display()))?;
    Ok(())
}

/// Move a file, falling back to copy + remove across filesystems.
pub fn move_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        ensure_dir(parent)?;
    }
    if fs::rename(src, dst).is_err() {
        copy_file(src, dst)?;
        fs::remove_file(src)
            .with_context(|| format!("failed to remove file: {}", src.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }
    fs::write(path, contents).with_context(|| format!("failed to write file: {}", path.display()))
}

/// Remove a file if it exists. Returns whether anything was removed.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    if path.is_file() {
        fs::remove_file(path)
            .with_context(|| format!("failed to remove file: {}", path.display()))?;
        return Ok(true);
    }
    Ok(false)
}

/// Remove a directory and all its contents, if it exists.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("failed to remove directory: {}", path.display()))?;
    }
    Ok(())
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Get the file name of a path as a `String`.
pub fn file_name_string(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}
