//! # External Process Execution (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! Every interaction the launcher has with the outside world (configuring the
//! dev environment, scaffolding through the dependency manager, health checks,
//! starting and opening the site) is a child process run to completion. This
//! module puts those interactions behind the `CommandRunner` trait so the state
//! machine can be driven by a recording fake in unit tests.
//!
//! ## Architecture
//!
//! - **`CommandRunner`**: the seam. `locate` resolves a tool, `run` executes it.
//! - **`SystemRunner`**: the real implementation. Lookup goes through
//!   `common::system::find_tool` and execution through `std::process::Command`
//!   with inherited stdio, so the user sees the tool's own output live.
//!
//! A child that exits non-zero becomes `LauncherError::ExternalCommand`. A child
//! that cannot be spawned at all is reported with context through `anyhow`.
//!
//! ## Usage
//!
//! ```rust
//! let runner = SystemRunner;
//! let ddev = runner.locate("ddev").expect("ddev on PATH");
//! runner.run(&ddev, &["start".to_string()], project_root)?;
//! ```
//!
use crate::common::system;
use crate::core::error::{LauncherError, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Runs external programs on behalf of the launcher.
pub trait CommandRunner {
    /// Resolves `program` to an executable path, or `None` if it isn't installed.
    fn locate(&self, program: &str) -> Option<PathBuf> {
        system::find_tool(program)
    }

    /// Runs `program` with `args` in `cwd` and waits for it to exit.
    ///
    /// Returns `Ok(())` only when the child exits successfully.
    fn run(&self, program: &Path, args: &[String], cwd: &Path) -> Result<()>;
}

/// `CommandRunner` backed by real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[String], cwd: &Path) -> Result<()> {
        let cmdline = display_command(program, args);
        info!("Running: {}", cmdline);
        debug!("Working directory: {}", cwd.display());

        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .status()
            .with_context(|| format!("Failed to execute '{}'", cmdline))?;

        debug!("'{}' exited with {}", cmdline, status);
        if status.success() {
            Ok(())
        } else {
            Err(LauncherError::ExternalCommand {
                cmd: cmdline,
                status: status.to_string(),
            }
            .into())
        }
    }
}

/// Renders a command line for logs and error messages.
pub fn display_command(program: &Path, args: &[String]) -> String {
    let name = program
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string());
    if args.is_empty() {
        name
    } else {
        format!("{} {}", name, args.join(" "))
    }
}
