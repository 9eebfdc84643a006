//! # Filesystem Copy Operations
//!
//! File: cli/src/common/fs/copy.rs
//!
//! ## Overview
//!
//! Copies the top-level entries of a directory into another directory. The
//! snapshot uses this for entries that must stay in the project root while it
//! is cleared, such as an existing `.ddev` tree.
//!
//! ## Architecture
//!
//! `copy_entries_into` hands the list to `fs_extra::copy_items`, which copies
//! plain files and recurses into directories in one call. Errors are wrapped
//! into the application's `Result` with `anyhow` context.
//!
use crate::core::error::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Copies each path in `entries` into the existing directory `target`.
///
/// Every entry keeps its own name, so `root/web` ends up as `target/web`.
/// Existing files in `target` are overwritten.
///
/// # Errors
///
/// Returns an `Err` if any entry can't be read or `target` can't be written.
pub fn copy_entries_into(entries: &[PathBuf], target: &Path) -> Result<()> {
    if entries.is_empty() {
        debug!("Nothing to copy into {:?}", target);
        return Ok(());
    }
    info!("Copying {} entries into {:?}", entries.len(), target);

    let mut options = fs_extra::dir::CopyOptions::new();
    options.overwrite = true;

    fs_extra::copy_items(entries, target, &options).map_err(|e| {
        anyhow::anyhow!(e).context(format!("Failed to copy entries into {:?}", target))
    })?;

    debug!("Finished copying into {:?}", target);
    Ok(())
}
