//! # Launcher Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout the launcher. Every
//! failure a user can hit is classified into one `LauncherError` variant, and
//! each variant carries a fixed process exit code so that `main` can translate
//! an error into the right status without knowing where it came from.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `LauncherError`: A custom error enum using `thiserror` for the failure classes
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! Exit codes:
//! - `1`: dev-environment tool missing, or any unclassified failure
//! - `2`: the current directory is not a Drupal CMS project
//! - `3`: configuration or build failure (the snapshot was restored)
//!
//! The user-facing messages are literal, stable strings. Tooling and tests
//! match on them, so changing the wording is a breaking change.
//!
//! ## Examples
//!
//! ```rust
//! // Return a classified error
//! if !marker.is_file() {
//!     return Err(LauncherError::NotAProject.into());
//! }
//!
//! // Recover the exit code at the top level
//! let code = exit_code_for(&err);
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the launcher.
#[derive(Error, Debug)]
pub enum LauncherError {
    #[error("FATAL: We do not appear to be in a Drupal CMS project.")]
    NotAProject,

    #[error("{tool} needs to be installed. Visit https://ddev.com/get-started for instructions.")]
    ToolMissing { tool: String },

    #[error("The Drupal CMS project could not be configured for {tool}. The project directory has been restored.")]
    ConfigureFailed { tool: String },

    #[error("This project does not appear to have been set up correctly with Composer.")]
    SetupFailed,

    #[error("Restoring the project directory failed after an earlier error ({original}). Your original files are kept in {}.", .backup.display())]
    RestoreFailed { backup: PathBuf, original: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("External command failed: {cmd}, Status: {status}")]
    ExternalCommand { cmd: String, status: String },
}

impl LauncherError {
    /// The process exit code this failure class is reported with.
    pub fn exit_code(&self) -> i32 {
        match self {
            LauncherError::NotAProject => 2,
            LauncherError::ToolMissing { .. } => 1,
            LauncherError::ConfigureFailed { .. }
            | LauncherError::SetupFailed
            | LauncherError::RestoreFailed { .. } => 3,
            LauncherError::Config(_)
            | LauncherError::FileSystem(_)
            | LauncherError::ExternalCommand { .. } => 1,
        }
    }
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

/// Finds the exit code for an arbitrary error chain.
///
/// The outermost `LauncherError` in the chain wins, so context added on top
/// of a classified error doesn't change how it is reported. Errors without
/// any `LauncherError` in them exit with `1`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(classified) = err.downcast_ref::<LauncherError>() {
        return classified.exit_code();
    }
    err.chain()
        .find_map(|cause| cause.downcast_ref::<LauncherError>())
        .map_or(1, LauncherError::exit_code)
}
