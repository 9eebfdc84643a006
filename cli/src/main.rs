//! # Drupal CMS Launcher Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for `launch-drupal-cms`.
//! It handles:
//! - Command-line argument parsing using Clap (environment inputs included)
//! - Setting up the logging system based on verbosity flags
//! - Running the launch command
//! - Mapping failures to the launcher's fixed exit codes
//!
//! ## Exit codes
//!
//! - `0`: launched, or already running inside the dev environment
//! - `1`: the dev-environment tool is missing (or another unclassified failure)
//! - `2`: the current directory is not a Drupal CMS project
//! - `3`: configuration or build failed; the project directory was restored
//!
//! ## Examples
//!
//! ```bash
//! # Launch the project in the current directory
//! launch-drupal-cms
//!
//! # Same, with progress logging
//! launch-drupal-cms -vv
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // The launch command and its state machine
mod common; // Shared utilities (fs, process, system)
mod core; // Core infrastructure (errors, config)

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "launch-drupal-cms",
    about = "Set up and open a Drupal CMS project in DDEV",
    long_about = "Configures the Drupal CMS project in the current directory for DDEV,\n\
                  builds it on first run, then starts it and opens it in the browser.\n\
                  Behavior is controlled by IS_DDEV_PROJECT, COMPOSER_CREATE and\n\
                  LAUNCH_DRUPAL_CMS_CONFIG.",
    version
)]
struct Cli {
    #[command(flatten)]
    launch: commands::launch::LaunchArgs,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = commands::launch::handle_launch(cli.launch) {
        tracing::error!("Launch failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(crate::core::error::exit_code_for(&e));
    }
}
