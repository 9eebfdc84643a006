//! # Launch Command
//!
//! File: cli/src/commands/launch/mod.rs
//!
//! ## Overview
//!
//! This module is the entry point for the launcher's only job: take the Drupal
//! CMS project in the current directory and get it running in the local dev
//! environment. The project is configured and built on first use, and the
//! site is opened in the browser.
//!
//! ## Architecture
//!
//! - `LaunchArgs`: the environment inputs, read through Clap's `env` support.
//! - `handle_launch`: loads configuration, builds a `LaunchContext`, runs the
//!   `Launcher` state machine with the real `SystemRunner`, and reports the outcome.
//! - `launcher`: the state machine itself.
//! - `state`: the `LaunchState` enum.
//! - `tool`: argument lists for the dev-environment tool.
//!
//! ## Examples
//!
//! ```bash
//! # First run: configure, scaffold drupal/cms, start, open
//! launch-drupal-cms
//!
//! # Scaffold a different template
//! COMPOSER_CREATE="drupal/cms:^1.1" launch-drupal-cms
//! ```
//!
use crate::common::process::SystemRunner;
use crate::core::config::{self, Config};
use crate::core::error::Result;
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use tracing::{debug, info};

mod launcher;
mod state;
mod tool;

use launcher::{LaunchContext, LaunchOutcome, Launcher};

/// # Launch Arguments (`LaunchArgs`)
///
/// The launcher takes no flags of its own. Its behavior is driven by the
/// environment. These hidden arguments exist so Clap can read the environment
/// in one place. The long forms are accepted for scripting but not advertised.
#[derive(Args, Debug, Default)]
pub struct LaunchArgs {
    /// `true` when running inside the dev environment (set by DDEV itself).
    #[arg(long, env = "IS_DDEV_PROJECT", hide = true)]
    pub is_ddev_project: Option<String>,

    /// Package template to scaffold instead of the configured default.
    #[arg(long, env = "COMPOSER_CREATE", hide = true)]
    pub template: Option<String>,

    /// Extra configuration file, applied on top of the user configuration.
    #[arg(long, env = "LAUNCH_DRUPAL_CMS_CONFIG", hide = true)]
    pub config: Option<PathBuf>,
}

impl LaunchArgs {
    fn inside_dev_env(&self) -> bool {
        self.is_ddev_project
            .as_deref()
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    }

    fn template(&self) -> Option<String> {
        self.template
            .clone()
            .filter(|t| !t.trim().is_empty())
    }
}

/// # Handle Launch (`handle_launch`)
///
/// Runs the launcher against the current directory.
///
/// ## Returns
///
/// * `Ok(())` when the project was launched or is already running.
/// * `Err` carrying a `LauncherError` when a precondition, configuration, or
///   build step failed. `main` turns it into the matching exit code.
pub fn handle_launch(args: LaunchArgs) -> Result<()> {
    debug!("Launch args: {:?}", args);

    // Inside the dev environment no configuration is read, not even a broken one.
    let inside_dev_env = args.inside_dev_env();
    let cfg = if inside_dev_env {
        Config::default()
    } else {
        config::load_config(args.config.as_deref())
            .context("Failed to load launcher configuration")?
    };
    let root = std::env::current_dir().context("Failed to determine the current directory")?;

    let ctx = LaunchContext {
        root,
        inside_dev_env,
        template: args.template(),
    };
    info!("Launching project in {}", ctx.root.display());

    let runner = SystemRunner;
    match Launcher::new(&runner, &cfg, ctx).run()? {
        LaunchOutcome::AlreadyRunning => {
            println!("Drupal CMS is already running.");
        }
        LaunchOutcome::Launched { built } => {
            if built {
                println!("Drupal CMS has been set up.");
            }
            println!("Drupal CMS is running.");
        }
    }
    Ok(())
}
