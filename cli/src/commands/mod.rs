//! # Launcher Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the command logic of the launcher. There is a
//! single command, `launch`, which `main.rs` runs unconditionally; it is kept
//! in its own module so its state machine, tool arguments, and tests stay
//! separate from the entry point.
//!

/// Configures, builds, starts, and opens the Drupal CMS project in the current directory.
pub mod launch;
