//! # Launcher State Machine
//!
//! File: cli/src/commands/launch/launcher.rs
//!
//! ## Overview
//!
//! `Launcher` brings a Drupal CMS project from "unconfigured" (or "configured
//! but never built") to "running and open in the browser". It walks the
//! `LaunchState` machine one state at a time. All external work goes through a
//! `CommandRunner`, so the whole sequence can be exercised against a fake.
//!
//! ## Failure handling
//!
//! - Precondition failures (not a project, tool missing) happen before any
//!   mutation, so nothing needs cleaning up.
//! - Everything in `Build` runs inside `snapshot::scoped`, which moves the
//!   project files aside so configure and scaffold start from a cleared root.
//!   Only an existing dev-environment config stays in place. A failure at any
//!   point restores the project directory before the error leaves this module.
//! - A failing health check is not an error; it only decides the log line
//!   before `start`.
//! - Nothing is retried. The user re-runs the launcher.
//!
use super::state::LaunchState;
use super::tool;
use crate::common::fs::snapshot;
use crate::common::process::CommandRunner;
use crate::core::config::Config;
use crate::core::error::{LauncherError, Result};
use anyhow::Context;
use std::ffi::OsStr;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Inputs that come from the invoking environment rather than config files.
#[derive(Debug, Clone)]
pub struct LaunchContext {
    /// Project root (the current directory).
    pub root: PathBuf,
    /// `IS_DDEV_PROJECT=true`: we are already inside the dev environment.
    pub inside_dev_env: bool,
    /// `COMPOSER_CREATE`: package template to scaffold instead of the default.
    pub template: Option<String>,
}

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Nothing was done because we are inside the dev environment.
    AlreadyRunning,
    /// The project was started and opened; `built` is true if it was set up in this run.
    Launched { built: bool },
}

pub struct Launcher<'a, R: CommandRunner> {
    runner: &'a R,
    config: &'a Config,
    ctx: LaunchContext,
    tool: Option<PathBuf>,
    built: bool,
}

impl<'a, R: CommandRunner> Launcher<'a, R> {
    pub fn new(runner: &'a R, config: &'a Config, ctx: LaunchContext) -> Self {
        Self {
            runner,
            config,
            ctx,
            tool: None,
            built: false,
        }
    }

    /// Drives the state machine to a terminal state.
    pub fn run(&mut self) -> Result<LaunchOutcome> {
        let mut state = LaunchState::CheckEnvironment;
        while !state.is_terminal() {
            debug!("Entering state {}", state);
            state = self.step(state)?;
        }
        debug!("Finished in state {}", state);

        Ok(match state {
            LaunchState::AlreadyRunning => LaunchOutcome::AlreadyRunning,
            _ => LaunchOutcome::Launched { built: self.built },
        })
    }

    fn step(&mut self, state: LaunchState) -> Result<LaunchState> {
        match state {
            LaunchState::CheckEnvironment => Ok(self.check_environment()),
            LaunchState::CheckProjectMarker => self.check_project_marker(),
            LaunchState::CheckDevToolInstalled => self.check_dev_tool_installed(),
            LaunchState::CheckConfigured => Ok(self.check_configured()),
            LaunchState::Build => self.build(),
            LaunchState::CheckRunning => Ok(self.check_running()),
            LaunchState::Start => self.start(),
            LaunchState::Open => self.open(),
            terminal @ (LaunchState::AlreadyRunning | LaunchState::Done) => Ok(terminal),
        }
    }

    fn check_environment(&self) -> LaunchState {
        if self.ctx.inside_dev_env {
            info!("IS_DDEV_PROJECT is set; nothing to launch");
            LaunchState::AlreadyRunning
        } else {
            LaunchState::CheckProjectMarker
        }
    }

    fn check_project_marker(&self) -> Result<LaunchState> {
        let marker = self.config.project.marker_path(&self.ctx.root);
        if marker.is_file() {
            debug!("Found project marker {}", marker.display());
            Ok(LaunchState::CheckDevToolInstalled)
        } else {
            warn!("Project marker {} not found", marker.display());
            Err(LauncherError::NotAProject.into())
        }
    }

    fn check_dev_tool_installed(&mut self) -> Result<LaunchState> {
        match self.runner.locate(&self.config.dev_tool.binary) {
            Some(path) => {
                info!("Using {} at {}", self.config.dev_tool.display_name, path.display());
                self.tool = Some(path);
                Ok(LaunchState::CheckConfigured)
            }
            None => Err(LauncherError::ToolMissing {
                tool: self.config.dev_tool.display_name.clone(),
            }
            .into()),
        }
    }

    fn check_configured(&self) -> LaunchState {
        let configured = self.is_configured();
        let built = self.is_built();
        debug!("Project configured: {}, built: {}", configured, built);
        if configured && built {
            LaunchState::CheckRunning
        } else {
            LaunchState::Build
        }
    }

    fn build(&mut self) -> Result<LaunchState> {
        let root = self.ctx.root.clone();
        let needs_config = !self.is_configured();
        let template = self.template().to_string();
        let keep: Vec<&OsStr> = self.config.project.config_entry().into_iter().collect();

        println!("Setting up Drupal CMS in {}...", root.display());
        snapshot::scoped(&root, &self.config.project.backup_prefix, &keep, || {
            if needs_config {
                self.configure()?;
            } else {
                info!("Existing configuration found; skipping configure");
            }
            self.scaffold(&template)?;
            if !self.is_built() {
                warn!(
                    "{} is missing after scaffolding",
                    self.config.project.entry_path(&root).display()
                );
                return Err(LauncherError::SetupFailed.into());
            }
            Ok(())
        })?;

        self.built = true;
        Ok(LaunchState::CheckRunning)
    }

    fn configure(&self) -> Result<()> {
        let name = tool::project_name(&self.ctx.root);
        info!("Configuring project '{}'", name);
        self.run_tool(&tool::configure_args(self.config, &name))
            .context(LauncherError::ConfigureFailed {
                tool: self.config.dev_tool.display_name.clone(),
            })
    }

    fn scaffold(&self, template: &str) -> Result<()> {
        info!("Creating project from template '{}'", template);
        self.run_tool(&tool::scaffold_args(template))
            .context(LauncherError::SetupFailed)
    }

    fn check_running(&self) -> LaunchState {
        match self.run_tool(&tool::health_check_args(self.config)) {
            Ok(()) => info!("Health check passed"),
            Err(e) => info!("Health check failed ({:#}); starting the environment", e),
        }
        LaunchState::Start
    }

    fn start(&self) -> Result<LaunchState> {
        self.run_tool(&tool::start_args())
            .with_context(|| format!("Failed to start {}", self.config.dev_tool.display_name))?;
        Ok(LaunchState::Open)
    }

    fn open(&self) -> Result<LaunchState> {
        self.run_tool(&tool::open_args())
            .context("Failed to open the project in a browser")?;
        Ok(LaunchState::Done)
    }

    fn run_tool(&self, args: &[String]) -> Result<()> {
        let tool = self
            .tool
            .as_deref()
            .context("Dev-environment tool used before it was located")?;
        self.runner.run(tool, args, &self.ctx.root)
    }

    fn is_configured(&self) -> bool {
        self.config.project.config_path(&self.ctx.root).is_file()
    }

    fn is_built(&self) -> bool {
        self.config.project.entry_path(&self.ctx.root).is_file()
    }

    /// The template from the environment, or the configured default.
    fn template(&self) -> &str {
        self.ctx
            .template
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.config.project.default_template)
    }
}
