//! # Launcher States
//!
//! File: cli/src/commands/launch/state.rs
//!
//! ## Overview
//!
//! The launcher is a finite-state machine. Each state is handled by exactly
//! one method on `Launcher`, which decides the next state. The happy paths are:
//!
//! ```text
//! CheckEnvironment ─► AlreadyRunning                       (inside the dev env)
//! CheckEnvironment ─► CheckProjectMarker ─► CheckDevToolInstalled ─► CheckConfigured
//! CheckConfigured  ─► Build ─► CheckRunning ─► Start ─► Open ─► Done   (not built)
//! CheckConfigured  ─► CheckRunning ─► Start ─► Open ─► Done            (built)
//! ```
//!
//! Any state may also fail, which ends the run with a classified error.
//!
use std::fmt;

/// One step of the launch sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    /// Are we already inside the dev environment?
    CheckEnvironment,
    /// Is the marker file present?
    CheckProjectMarker,
    /// Is the dev-environment tool installed?
    CheckDevToolInstalled,
    /// Is the project configured and built?
    CheckConfigured,
    /// Snapshot, configure if needed, scaffold, verify. Restores on failure.
    Build,
    /// Health check through the tool's interpreter. Never fails the run.
    CheckRunning,
    Start,
    Open,
    /// Terminal: the launcher ran inside the dev environment and did nothing.
    AlreadyRunning,
    /// Terminal: the project is running and has been opened.
    Done,
}

impl LaunchState {
    pub fn is_terminal(self) -> bool {
        matches!(self, LaunchState::AlreadyRunning | LaunchState::Done)
    }
}

impl fmt::Display for LaunchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LaunchState::CheckEnvironment => "CHECK_ENVIRONMENT",
            LaunchState::CheckProjectMarker => "CHECK_PROJECT_MARKER",
            LaunchState::CheckDevToolInstalled => "CHECK_DEV_TOOL_INSTALLED",
            LaunchState::CheckConfigured => "CHECK_CONFIGURED",
            LaunchState::Build => "BUILD",
            LaunchState::CheckRunning => "CHECK_RUNNING",
            LaunchState::Start => "START",
            LaunchState::Open => "OPEN",
            LaunchState::AlreadyRunning => "ALREADY_RUNNING",
            LaunchState::Done => "DONE",
        };
        f.write_str(name)
    }
}
