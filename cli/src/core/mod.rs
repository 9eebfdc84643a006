//! # Launcher Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the core infrastructure that every other part of
//! the launcher builds on:
//! - `config`: Configuration loading, merging, and validation
//! - `error`: The classified `LauncherError` and its exit codes
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{LauncherError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
