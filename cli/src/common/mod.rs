//! # Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared utilities used by the launch command, kept apart from the command
//! logic (`commands::`) and the core infrastructure (`core::`).
//!
//! - **`fs`**: snapshots and the filesystem helpers behind them.
//! - **`process`**: the `CommandRunner` seam for running external tools.
//! - **`system`**: detecting whether a host tool is installed.
//!

/// Filesystem operations (copy, I/O, snapshots).
pub mod fs;
/// Running external processes.
pub mod process;
/// Host tool detection.
pub mod system;
