//! # Launcher Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests. They build a throwaway Drupal
//! CMS project directory and a fake `ddev` executable that records every
//! invocation to a log file and imitates just enough of the real tool:
//! - `config` writes `.ddev/config.yaml`
//! - `composer create` creates a `web/index.php` docroot
//! - everything else succeeds without doing anything
//!
//! Setting `FAKE_DDEV_FAIL` to a space-separated list of subcommands makes
//! those fail, and `FAKE_DDEV_NO_WEBROOT=1` makes `composer create` "succeed"
//! without producing a docroot.
//!

#![allow(dead_code)]

pub use assert_cmd::Command;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FAKE_DDEV: &str = r#"#!/bin/sh
printf '%s\n' "$*" >> "$FAKE_DDEV_LOG"
for failing in $FAKE_DDEV_FAIL; do
  if [ "$failing" = "$1" ]; then
    if [ "$1" = "config" ]; then
      mkdir -p .ddev && echo "name: partial" > .ddev/config.yaml
    fi
    exit 1
  fi
done
case "$1" in
  config)
    mkdir -p .ddev
    echo "type: drupal11" > .ddev/config.yaml
    ;;
  composer)
    if [ -z "$FAKE_DDEV_NO_WEBROOT" ]; then
      mkdir -p web
      echo "<?php" > web/index.php
    fi
    ;;
esac
exit 0
"#;

/// A directory holding the fake `ddev` plus its invocation log, and an
/// isolated home so no real user configuration leaks into the run.
pub struct FakeDdev {
    dir: TempDir,
    pub bin: PathBuf,
    pub log: PathBuf,
    pub home: PathBuf,
}

impl FakeDdev {
    pub fn install() -> Self {
        let dir = tempfile::tempdir().expect("tempdir for fake ddev");
        let bin = dir.path().join("bin");
        let home = dir.path().join("home");
        fs::create_dir_all(&bin).unwrap();
        fs::create_dir_all(&home).unwrap();

        let script = bin.join("ddev");
        fs::write(&script, FAKE_DDEV).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        }

        let log = dir.path().join("ddev.log");
        Self { dir, bin, log, home }
    }

    /// An empty bin directory: `ddev` is not installed.
    pub fn missing() -> Self {
        let fake = Self::install();
        fs::remove_file(fake.bin.join("ddev")).unwrap();
        fake
    }

    /// Every recorded invocation, one argument string per line.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn scratch(&self) -> &Path {
        self.dir.path()
    }
}

/// Creates a freshly downloaded, unconfigured Drupal CMS project.
pub fn new_project() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir for project");
    fs::write(dir.path().join(".drupal-cms"), "").unwrap();
    fs::write(
        dir.path().join("composer.json"),
        r#"{"name":"drupal/cms-launcher-test","type":"project"}"#,
    )
    .unwrap();
    fs::write(dir.path().join("README.md"), "# Drupal CMS\n").unwrap();
    fs::create_dir_all(dir.path().join("recipes/demo")).unwrap();
    fs::write(dir.path().join("recipes/demo/recipe.yml"), "name: Demo\n").unwrap();
    dir
}

/// Builds a launcher command running in `project` against `ddev`.
pub fn launcher_cmd(project: &Path, ddev: &FakeDdev) -> Command {
    let mut cmd = Command::cargo_bin("launch-drupal-cms")
        .expect("Failed to find launch-drupal-cms binary for testing");
    let path = format!("{}:/usr/bin:/bin", ddev.bin.display());
    cmd.current_dir(project)
        .env("PATH", path)
        .env("HOME", &ddev.home)
        .env("XDG_CONFIG_HOME", ddev.home.join(".config"))
        .env("FAKE_DDEV_LOG", &ddev.log)
        .env_remove("IS_DDEV_PROJECT")
        .env_remove("COMPOSER_CREATE")
        .env_remove("LAUNCH_DRUPAL_CMS_CONFIG")
        .env_remove("FAKE_DDEV_FAIL")
        .env_remove("FAKE_DDEV_NO_WEBROOT")
        .env_remove("RUST_LOG");
    cmd
}

/// Writes `.ddev/config.yaml` as `ddev config` would.
pub fn configure(project: &Path) {
    fs::create_dir_all(project.join(".ddev")).unwrap();
    fs::write(project.join(".ddev/config.yaml"), "type: drupal11\n").unwrap();
}

/// Names of the direct children of `dir`.
pub fn entries(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

/// True if any path below `dir`, at any depth, looks like a launcher backup.
pub fn has_backup(dir: &Path) -> bool {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .any(|e| e.file_name().to_string_lossy().starts_with(".launch-backup"))
}
