//! # Launcher Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements configuration loading, merging, and validation for
//! the launcher. Everything the launcher assumes about the project layout and
//! the dev-environment tool (binary name, marker file, docroot, default
//! package template, ...) lives here, so that a different layout can be
//! supported by editing a TOML file instead of the state machine.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. The file named by `LAUNCH_DRUPAL_CMS_CONFIG` (passed in as `override_path`)
//! 2. User-specific `config.toml` in the platform config dir
//!    (e.g. `~/.config/drupal-cms-launcher/config.toml`)
//! 3. Default values defined in the code
//!
//! A higher-precedence source only replaces values it actually changes from
//! the defaults. Paths are tilde-expanded and the final configuration is
//! validated before use.
//!
//! ## Examples
//!
//! ```toml
//! [dev_tool]
//! binary = "~/bin/ddev"
//! php_version = "8.3"
//!
//! [project]
//! default_template = "drupal/cms:^1.0"
//! ```
//!
use crate::core::error::{LauncherError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    ffi::OsStr,
    fs,
    path::{Component, Path, PathBuf},
};
use tracing::{debug, info};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub dev_tool: DevToolConfig,
    #[serde(default)]
    pub project: ProjectConfig,
}

/// How the dev-environment tool is found and driven.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DevToolConfig {
    /// Binary name looked up on PATH, or a path to the binary (can use ~).
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Name shown to the user in messages, e.g. "DDEV needs to be installed."
    #[serde(default = "default_display_name")]
    pub display_name: String,
    /// Value passed as `--project-type` when configuring.
    #[serde(default = "default_project_type")]
    pub project_type: String,
    /// Optional `--php-version` passed when configuring.
    #[serde(default)]
    pub php_version: Option<String>,
    /// Arguments that run the tool's internal interpreter as a health check.
    #[serde(default = "default_health_check_args")]
    pub health_check_args: Vec<String>,
}

/// The on-disk layout of a Drupal CMS project.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// File whose presence identifies a project root.
    #[serde(default = "default_marker_file")]
    pub marker_file: String,
    /// Dev-environment config file, relative to the project root.
    #[serde(default = "default_config_file")]
    pub config_file: String,
    /// Web root directory, relative to the project root.
    #[serde(default = "default_docroot")]
    pub docroot: String,
    /// File inside the docroot whose presence means "the project is built".
    #[serde(default = "default_entry_file")]
    pub entry_file: String,
    /// Package template scaffolded when COMPOSER_CREATE is not set.
    #[serde(default = "default_template")]
    pub default_template: String,
    /// Name prefix of the transient backup directory.
    #[serde(default = "default_backup_prefix")]
    pub backup_prefix: String,
}

impl Default for DevToolConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            display_name: default_display_name(),
            project_type: default_project_type(),
            php_version: None,
            health_check_args: default_health_check_args(),
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            marker_file: default_marker_file(),
            config_file: default_config_file(),
            docroot: default_docroot(),
            entry_file: default_entry_file(),
            default_template: default_template(),
            backup_prefix: default_backup_prefix(),
        }
    }
}

impl ProjectConfig {
    pub fn marker_path(&self, root: &Path) -> PathBuf {
        root.join(&self.marker_file)
    }

    pub fn config_path(&self, root: &Path) -> PathBuf {
        root.join(&self.config_file)
    }

    /// Top-level entry holding the dev-environment config (`.ddev`). It stays
    /// in place while the project root is cleared for a build.
    pub fn config_entry(&self) -> Option<&OsStr> {
        match Path::new(&self.config_file).components().next() {
            Some(Component::Normal(name)) => Some(name),
            _ => None,
        }
    }

    /// Full path of the "is built" signal file, `<root>/<docroot>/<entry_file>`.
    pub fn entry_path(&self, root: &Path) -> PathBuf {
        root.join(&self.docroot).join(&self.entry_file)
    }
}

fn default_binary() -> String {
    "ddev".to_string()
}
fn default_display_name() -> String {
    "DDEV".to_string()
}
fn default_project_type() -> String {
    "drupal11".to_string()
}
fn default_health_check_args() -> Vec<String> {
    vec!["php".to_string(), "--version".to_string()]
}
fn default_marker_file() -> String {
    ".drupal-cms".to_string()
}
fn default_config_file() -> String {
    ".ddev/config.yaml".to_string()
}
fn default_docroot() -> String {
    "web".to_string()
}
fn default_entry_file() -> String {
    "index.php".to_string()
}
fn default_template() -> String {
    "drupal/cms".to_string()
}
fn default_backup_prefix() -> String {
    ".launch-backup".to_string()
}

/// Loads, merges, expands and validates the configuration.
///
/// `override_path` is the file named by `LAUNCH_DRUPAL_CMS_CONFIG`. Unlike
/// the user file, it must exist when given.
pub fn load_config(override_path: Option<&Path>) -> Result<Config> {
    let user_config = load_user_config()?;
    let override_config = match override_path {
        Some(path) => {
            info!("Loading configuration override from: {}", path.display());
            Some(load_config_from_path(path)?)
        }
        None => None,
    };
    let mut merged = merge_configs(user_config.unwrap_or_default(), override_config);
    expand_config_paths(&mut merged);
    validate_config(&merged).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged);
    Ok(merged)
}

fn load_user_config() -> Result<Option<Config>> {
    let Some(proj_dirs) = ProjectDirs::from("org", "Drupal", "drupal-cms-launcher") else {
        debug!("Could not determine user config directory.");
        return Ok(None);
    };
    let config_path = proj_dirs.config_dir().join("config.toml");
    if config_path.is_file() {
        info!("Loading user configuration from: {}", config_path.display());
        load_config_from_path(&config_path).map(Some)
    } else {
        debug!(
            "User configuration file not found at {}",
            config_path.display()
        );
        Ok(None)
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Overlays every value of `overlay` that differs from the built-in default
/// onto `base`.
fn merge_configs(base: Config, overlay: Option<Config>) -> Config {
    let Some(over) = overlay else {
        return base;
    };
    let defaults = Config::default();

    fn pick<T: PartialEq>(over: T, base: T, default: &T) -> T {
        if &over != default {
            over
        } else {
            base
        }
    }

    Config {
        dev_tool: DevToolConfig {
            binary: pick(over.dev_tool.binary, base.dev_tool.binary, &defaults.dev_tool.binary),
            display_name: pick(
                over.dev_tool.display_name,
                base.dev_tool.display_name,
                &defaults.dev_tool.display_name,
            ),
            project_type: pick(
                over.dev_tool.project_type,
                base.dev_tool.project_type,
                &defaults.dev_tool.project_type,
            ),
            php_version: over.dev_tool.php_version.or(base.dev_tool.php_version),
            health_check_args: pick(
                over.dev_tool.health_check_args,
                base.dev_tool.health_check_args,
                &defaults.dev_tool.health_check_args,
            ),
        },
        project: ProjectConfig {
            marker_file: pick(
                over.project.marker_file,
                base.project.marker_file,
                &defaults.project.marker_file,
            ),
            config_file: pick(
                over.project.config_file,
                base.project.config_file,
                &defaults.project.config_file,
            ),
            docroot: pick(over.project.docroot, base.project.docroot, &defaults.project.docroot),
            entry_file: pick(
                over.project.entry_file,
                base.project.entry_file,
                &defaults.project.entry_file,
            ),
            default_template: pick(
                over.project.default_template,
                base.project.default_template,
                &defaults.project.default_template,
            ),
            backup_prefix: pick(
                over.project.backup_prefix,
                base.project.backup_prefix,
                &defaults.project.backup_prefix,
            ),
        },
    }
}

fn expand_config_paths(config: &mut Config) {
    config.dev_tool.binary = shellexpand::tilde(&config.dev_tool.binary).into_owned();
    debug!("Expanded dev tool binary: {}", config.dev_tool.binary);
}

fn validate_config(config: &Config) -> Result<()> {
    let required = [
        ("dev_tool.binary", &config.dev_tool.binary),
        ("dev_tool.display_name", &config.dev_tool.display_name),
        ("dev_tool.project_type", &config.dev_tool.project_type),
        ("project.marker_file", &config.project.marker_file),
        ("project.config_file", &config.project.config_file),
        ("project.docroot", &config.project.docroot),
        ("project.entry_file", &config.project.entry_file),
        ("project.default_template", &config.project.default_template),
        ("project.backup_prefix", &config.project.backup_prefix),
    ];
    for (key, value) in required {
        if value.trim().is_empty() {
            return Err(anyhow!(LauncherError::Config(format!(
                "'{}' cannot be empty.",
                key
            ))));
        }
    }
    if config.dev_tool.health_check_args.is_empty() {
        return Err(anyhow!(LauncherError::Config(
            "'dev_tool.health_check_args' cannot be empty.".to_string()
        )));
    }
    for (key, value) in [
        ("project.config_file", &config.project.config_file),
        ("project.docroot", &config.project.docroot),
        ("project.entry_file", &config.project.entry_file),
    ] {
        if Path::new(value).is_absolute() {
            return Err(anyhow!(LauncherError::Config(format!(
                "'{}' must be relative to the project root, got '{}'.",
                key, value
            ))));
        }
    }
    if config.project.backup_prefix.contains(['/', '\\']) {
        return Err(anyhow!(LauncherError::Config(format!(
            "'project.backup_prefix' must be a plain name, got '{}'.",
            config.project.backup_prefix
        ))));
    }
    Ok(())
}
