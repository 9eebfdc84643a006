//! # Project Snapshots (`common::fs::snapshot`)
//!
//! File: cli/src/common/fs/snapshot.rs
//!
//! ## Overview
//!
//! A `Snapshot` clears a project root for risky operations by moving its
//! contents into a transient backup directory inside that root. Afterwards the
//! snapshot is either discarded (the operations succeeded) or restored (they
//! failed). Restoring puts the root back to the same top-level entries with
//! the same bytes it had when the snapshot was taken.
//!
//! ## Architecture
//!
//! - `Snapshot::take` creates `<root>/<prefix>-<timestamp>`, moves every other
//!   top-level entry into it with `rename`, and leaves the entries named in
//!   `keep` in place. Kept entries are copied into the backup with `fs_extra`
//!   so they can be restored as well.
//! - `Snapshot::discard` deletes the backup directory.
//! - `Snapshot::restore` deletes everything else in the root, moves the backed
//!   up entries back, and deletes the then-empty backup directory.
//! - `scoped` ties the three together: take, run a closure, then discard on
//!   `Ok` or restore on `Err`.
//!
//! A snapshot that is dropped while still pending (for instance during a
//! panic unwind) restores itself from `Drop` and logs the outcome.
//!
//! If restoring fails part-way, the backup directory is left where it is.
//! Entries that were already moved back are in the root, and the rest are
//! still in the backup, so nothing is lost. The caller gets
//! `LauncherError::RestoreFailed` naming the backup path.
//!
//! ## Usage
//!
//! ```rust
//! let keep = [OsStr::new(".ddev")];
//! let built = snapshot::scoped(root, ".launch-backup", &keep, || {
//!     configure(root)?;
//!     build(root)
//! })?;
//! ```
//!
use crate::common::fs::{copy, io};
use crate::core::error::{LauncherError, Result};
use anyhow::Context;
use chrono::Local;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// A pending backup of a project root.
#[derive(Debug)]
pub struct Snapshot {
    root: PathBuf,
    backup: PathBuf,
    entries: Vec<OsString>,
    settled: bool,
}

impl Snapshot {
    /// Moves the contents of `root` into a new backup directory inside it.
    ///
    /// Entries whose names are in `keep` stay in `root`; a copy of each goes
    /// into the backup instead.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if the backup directory cannot be created or any entry
    /// fails to copy or move. Entries already moved are put back and the
    /// partial backup directory is removed, so a failed `take` leaves `root`
    /// unchanged. If putting an entry back fails too, the backup directory is
    /// kept and `LauncherError::RestoreFailed` names it.
    pub fn take(root: &Path, prefix: &str, keep: &[&OsStr]) -> Result<Self> {
        let backup = unique_backup_path(root, prefix);
        let backup_name = backup
            .file_name()
            .map(OsString::from)
            .context("Backup path has no file name")?;

        let sources = io::top_level_entries(root, Some(backup_name.as_os_str()))?;
        let (kept, moved): (Vec<PathBuf>, Vec<PathBuf>) = sources
            .iter()
            .cloned()
            .partition(|p| p.file_name().is_some_and(|n| keep.contains(&n)));
        fs::create_dir(&backup)
            .with_context(|| format!("Failed to create backup directory {:?}", backup))?;

        if let Err(e) = copy::copy_entries_into(&kept, &backup) {
            remove_partial_backup(&backup);
            return Err(anyhow::Error::new(LauncherError::FileSystem(format!(
                "Failed to snapshot {}: {:#}",
                root.display(),
                e
            ))));
        }
        if let Err(e) = move_entries_into(&moved, &backup) {
            if e.downcast_ref::<LauncherError>().is_some() {
                return Err(e);
            }
            remove_partial_backup(&backup);
            return Err(anyhow::Error::new(LauncherError::FileSystem(format!(
                "Failed to snapshot {}: {:#}",
                root.display(),
                e
            ))));
        }

        let (files, bytes) = io::tree_stats(&backup);
        info!(
            "Snapshot of {} taken at {} ({} files, {} bytes, {} kept in place)",
            root.display(),
            backup.display(),
            files,
            bytes,
            kept.len()
        );

        Ok(Self {
            root: root.to_path_buf(),
            entries: sources
                .iter()
                .filter_map(|p| p.file_name().map(OsString::from))
                .collect(),
            backup,
            settled: false,
        })
    }

    /// Where the backed up entries live until the snapshot is settled.
    pub fn backup_path(&self) -> &Path {
        &self.backup
    }

    /// Names of the top-level entries captured by this snapshot, kept ones included.
    pub fn entries(&self) -> &[OsString] {
        &self.entries
    }

    /// Throws the backup away, keeping the root as it is now.
    pub fn discard(mut self) -> Result<()> {
        self.settled = true;
        fs::remove_dir_all(&self.backup)
            .with_context(|| format!("Failed to remove backup directory {:?}", self.backup))?;
        info!("Discarded snapshot {}", self.backup.display());
        Ok(())
    }

    /// Puts the root back to exactly the state it was in at `take`.
    pub fn restore(mut self) -> Result<()> {
        self.settled = true;
        self.restore_in_place()
    }

    fn restore_in_place(&self) -> Result<()> {
        info!(
            "Restoring {} from {}",
            self.root.display(),
            self.backup.display()
        );
        let backup_name = self.backup.file_name().map(OsString::from);

        for current in io::top_level_entries(&self.root, backup_name.as_deref())? {
            io::remove_entry(&current)?;
        }
        for saved in io::top_level_entries(&self.backup, None)? {
            let Some(name) = saved.file_name() else {
                continue;
            };
            let target = self.root.join(name);
            fs::rename(&saved, &target)
                .with_context(|| format!("Failed to move {:?} back to {:?}", saved, target))?;
            debug!("Restored {:?}", target);
        }
        fs::remove_dir(&self.backup)
            .with_context(|| format!("Failed to remove backup directory {:?}", self.backup))?;
        info!("Restored {}", self.root.display());
        Ok(())
    }
}

impl Drop for Snapshot {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!(
            "Snapshot {} dropped while pending; restoring",
            self.backup.display()
        );
        if let Err(e) = self.restore_in_place() {
            error!(
                "Automatic restore failed, original files remain in {}: {:#}",
                self.backup.display(),
                e
            );
        }
    }
}

/// Runs `f` between taking and settling a snapshot of `root`.
///
/// On `Ok` the snapshot is discarded and the value returned. On `Err` the
/// snapshot is restored and `f`'s error is returned unchanged. If the restore
/// itself fails, `LauncherError::RestoreFailed` is returned instead.
pub fn scoped<T, F>(root: &Path, prefix: &str, keep: &[&OsStr], f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let snapshot = Snapshot::take(root, prefix, keep)?;
    let backup = snapshot.backup_path().to_path_buf();
    debug!(
        "Snapshot holds {} top-level entries: {:?}",
        snapshot.entries().len(),
        snapshot.entries()
    );

    match f() {
        Ok(value) => {
            snapshot.discard()?;
            Ok(value)
        }
        Err(original) => {
            warn!("Operation failed, rolling back: {:#}", original);
            match snapshot.restore() {
                Ok(()) => Err(original),
                Err(restore_err) => {
                    error!("Rollback failed: {:#}", restore_err);
                    Err(anyhow::Error::new(LauncherError::RestoreFailed {
                        backup,
                        original: original.to_string(),
                    }))
                }
            }
        }
    }
}

/// Renames each entry into `backup`. On failure, the entries moved so far are
/// renamed back before the error is returned.
fn move_entries_into(entries: &[PathBuf], backup: &Path) -> Result<()> {
    let mut moved: Vec<(&Path, PathBuf)> = Vec::with_capacity(entries.len());
    for source in entries {
        let Some(name) = source.file_name() else {
            continue;
        };
        let target = backup.join(name);
        if let Err(e) = fs::rename(source, &target) {
            for (original, saved) in moved.iter().rev() {
                if let Err(undo) = fs::rename(saved, original) {
                    error!("Could not move {:?} back to {:?}: {}", saved, original, undo);
                    return Err(anyhow::Error::new(LauncherError::RestoreFailed {
                        backup: backup.to_path_buf(),
                        original: format!("Failed to move {:?} into the backup: {}", source, e),
                    }));
                }
            }
            return Err(e).with_context(|| format!("Failed to move {:?} into {:?}", source, backup));
        }
        debug!("Moved {:?} into the backup", source);
        moved.push((source.as_path(), target));
    }
    Ok(())
}

fn remove_partial_backup(backup: &Path) {
    if let Err(cleanup) = fs::remove_dir_all(backup) {
        warn!("Could not remove partial backup {:?}: {}", backup, cleanup);
    }
}

/// Picks `<root>/<prefix>-<YYYYmmddHHMMSS>`, adding a counter on collision.
fn unique_backup_path(root: &Path, prefix: &str) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d%H%M%S").to_string();
    let mut candidate = root.join(format!("{}-{}", prefix, stamp));
    let mut n = 1;
    while candidate.exists() {
        candidate = root.join(format!("{}-{}-{}", prefix, stamp, n));
        n += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};
    use tempfile::tempdir;
    use walkdir::WalkDir;

    const PREFIX: &str = ".launch-backup";

    /// Relative path -> file contents (directories map to `None`).
    fn tree(root: &Path) -> BTreeMap<PathBuf, Option<Vec<u8>>> {
        WalkDir::new(root)
            .min_depth(1)
            .into_iter()
            .map(|e| e.unwrap())
            .map(|e| {
                let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
                let contents = e.file_type().is_file().then(|| fs::read(e.path()).unwrap());
                (rel, contents)
            })
            .collect()
    }

    fn names(root: &Path) -> BTreeSet<String> {
        fs::read_dir(root)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    fn project(root: &Path) {
        fs::write(root.join(".drupal-cms"), "").unwrap();
        fs::write(root.join("composer.json"), r#"{"name":"drupal/cms"}"#).unwrap();
        fs::write(root.join("launch-drupal-cms.sh"), "#!/bin/sh\n").unwrap();
        fs::create_dir_all(root.join("recipes/demo")).unwrap();
        fs::write(root.join("recipes/demo/recipe.yml"), "name: Demo\n").unwrap();
    }

    fn has_backup(root: &Path) -> bool {
        WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .any(|e| e.file_name().to_string_lossy().starts_with(PREFIX))
    }

    #[test]
    fn test_take_clears_the_root() {
        let dir = tempdir().unwrap();
        project(dir.path());

        let snapshot = Snapshot::take(dir.path(), PREFIX, &[]).unwrap();
        assert_eq!(snapshot.entries().len(), 4);
        assert!(snapshot
            .backup_path()
            .join("recipes/demo/recipe.yml")
            .is_file());

        let backup_name = snapshot
            .backup_path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        assert_eq!(names(dir.path()), BTreeSet::from([backup_name]));

        snapshot.discard().unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_take_leaves_kept_entries_in_place() {
        let dir = tempdir().unwrap();
        project(dir.path());
        fs::create_dir_all(dir.path().join(".ddev")).unwrap();
        fs::write(dir.path().join(".ddev/config.yaml"), "type: drupal11\n").unwrap();

        let snapshot = Snapshot::take(dir.path(), PREFIX, &[OsStr::new(".ddev")]).unwrap();

        assert!(dir.path().join(".ddev/config.yaml").is_file());
        assert!(!dir.path().join(".drupal-cms").exists());
        assert!(snapshot.backup_path().join(".ddev/config.yaml").is_file());
        assert!(snapshot.backup_path().join(".drupal-cms").is_file());
        snapshot.discard().unwrap();
        assert_eq!(names(dir.path()), BTreeSet::from([".ddev".to_string()]));
    }

    #[test]
    fn test_restore_is_byte_for_byte() {
        let dir = tempdir().unwrap();
        project(dir.path());
        fs::create_dir_all(dir.path().join(".ddev")).unwrap();
        fs::write(dir.path().join(".ddev/config.yaml"), "name: x\n").unwrap();
        let before = tree(dir.path());

        let snapshot = Snapshot::take(dir.path(), PREFIX, &[OsStr::new(".ddev")]).unwrap();
        fs::write(dir.path().join(".ddev/config.yaml"), "changed").unwrap();
        fs::write(dir.path().join(".ddev/extra.yaml"), "x").unwrap();
        fs::create_dir_all(dir.path().join("vendor")).unwrap();
        snapshot.restore().unwrap();

        assert_eq!(tree(dir.path()), before);
        assert!(!has_backup(dir.path()));
    }

    #[test]
    fn test_scoped_discards_on_success() {
        let dir = tempdir().unwrap();
        project(dir.path());

        let value = scoped(dir.path(), PREFIX, &[], || {
            fs::create_dir_all(dir.path().join("web"))?;
            fs::write(dir.path().join("web/index.php"), "<?php")?;
            Ok(42)
        })
        .unwrap();

        assert_eq!(value, 42);
        assert_eq!(names(dir.path()), BTreeSet::from(["web".to_string()]));
        assert!(!has_backup(dir.path()));
    }

    #[test]
    fn test_scoped_restores_on_failure() {
        let dir = tempdir().unwrap();
        project(dir.path());
        let before = tree(dir.path());

        let result: Result<()> = scoped(dir.path(), PREFIX, &[], || {
            fs::create_dir_all(dir.path().join(".ddev"))?;
            fs::create_dir_all(dir.path().join("web"))?;
            Err(LauncherError::SetupFailed.into())
        });

        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LauncherError>(),
            Some(LauncherError::SetupFailed)
        ));
        assert_eq!(tree(dir.path()), before);
    }

    #[test]
    fn test_drop_restores_pending_snapshot() {
        let dir = tempdir().unwrap();
        project(dir.path());
        let before = tree(dir.path());

        {
            let _snapshot = Snapshot::take(dir.path(), PREFIX, &[]).unwrap();
            fs::write(dir.path().join("stray.txt"), "x").unwrap();
        }

        assert_eq!(tree(dir.path()), before);
    }

    #[test]
    fn test_empty_root() {
        let dir = tempdir().unwrap();
        let result: Result<()> = scoped(dir.path(), PREFIX, &[], || {
            fs::write(dir.path().join("partial"), "x")?;
            anyhow::bail!("boom")
        });
        assert!(result.is_err());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_unique_backup_path_avoids_collisions() {
        let dir = tempdir().unwrap();
        let first = unique_backup_path(dir.path(), PREFIX);
        fs::create_dir(&first).unwrap();
        let second = unique_backup_path(dir.path(), PREFIX);
        assert_ne!(first, second);
    }
}
