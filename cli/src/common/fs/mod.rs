//! # Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! This module groups the filesystem helpers the launcher needs to protect a
//! project directory while it is being configured and built.
//!
//! ## Architecture
//!
//! - **`copy`**: copies a list of top-level entries into a directory (`fs_extra`).
//! - **`io`**: listing, removing and measuring directory entries (`walkdir`).
//! - **`snapshot`**: the take / discard / restore backup scope built on the two above.
//!
//! Callers import the submodule they need, e.g. `crate::common::fs::snapshot`.
//!

/// Copying top-level entries into a backup directory.
pub mod copy;
/// Listing, removing and measuring directory entries.
pub mod io;
/// Project snapshots with guaranteed discard-or-restore.
pub mod snapshot;
