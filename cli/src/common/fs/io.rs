//! # Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Small, context-rich wrappers around `std::fs` used by the snapshot code:
//! - **`top_level_entries`**: lists a directory's direct children, sorted, optionally skipping one name.
//! - **`remove_entry`**: removes a file, symlink, or whole directory tree.
//! - **`tree_stats`**: counts files and bytes below a path using `walkdir`.
//!
//! These functions add the failing path to every error so a user looking at a
//! failed restore knows exactly which entry was the problem.
//!
use crate::core::error::{LauncherError, Result};
use anyhow::Context;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Lists the direct children of `dir` in name order, skipping `exclude`.
///
/// # Errors
///
/// Returns an `Err` if `dir` is not a directory or cannot be read.
pub fn top_level_entries(dir: &Path, exclude: Option<&OsStr>) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!(LauncherError::FileSystem(format!(
            "Path is not a directory: {:?}",
            dir
        )));
    }
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read directory {:?}", dir))? {
        let entry = entry.with_context(|| format!("Failed to read an entry of {:?}", dir))?;
        if exclude.is_some_and(|name| entry.file_name().as_os_str() == name) {
            continue;
        }
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

/// Removes whatever is at `path`. Symlinks are removed, never followed.
pub fn remove_entry(path: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(path)
        .with_context(|| format!("Failed to inspect {:?} for removal", path))?;
    if meta.is_dir() {
        fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory {:?}", path))?;
    } else {
        fs::remove_file(path).with_context(|| format!("Failed to remove file {:?}", path))?;
    }
    debug!("Removed {:?}", path);
    Ok(())
}

/// Returns `(file_count, total_bytes)` for everything below `path`.
///
/// Unreadable entries are skipped; the numbers are only used for logging.
pub fn tree_stats(path: &Path) -> (u64, u64) {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .fold((0, 0), |(files, bytes), e| {
            let size = e.metadata().map(|m| m.len()).unwrap_or(0);
            (files + 1, bytes + size)
        })
}
