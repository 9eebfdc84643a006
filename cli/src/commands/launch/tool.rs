//! # Dev-Environment Tool Invocations
//!
//! File: cli/src/commands/launch/tool.rs
//!
//! Builds the argument lists the launcher passes to the dev-environment tool
//! (DDEV by default), and derives the project name it is configured with.
//!
use crate::core::config::Config;
use std::path::Path;

/// Project name used when the directory name has nothing usable in it.
const FALLBACK_PROJECT_NAME: &str = "drupal-cms";

/// `config --project-type=<type> --docroot=<docroot> --project-name=<name> [--php-version=<v>]`
pub fn configure_args(config: &Config, project_name: &str) -> Vec<String> {
    let mut args = vec![
        "config".to_string(),
        format!("--project-type={}", config.dev_tool.project_type),
        format!("--docroot={}", config.project.docroot),
        format!("--project-name={}", project_name),
    ];
    if let Some(php) = &config.dev_tool.php_version {
        args.push(format!("--php-version={}", php));
    }
    args
}

/// `composer create <template>`: scaffolds the project through the
/// dependency manager that runs inside the dev environment.
pub fn scaffold_args(template: &str) -> Vec<String> {
    vec![
        "composer".to_string(),
        "create".to_string(),
        template.to_string(),
    ]
}

pub fn health_check_args(config: &Config) -> Vec<String> {
    config.dev_tool.health_check_args.clone()
}

pub fn start_args() -> Vec<String> {
    vec!["start".to_string()]
}

pub fn open_args() -> Vec<String> {
    vec!["launch".to_string()]
}

/// Derives a hostname-safe project name from the project directory.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into one
/// `-`, and trims `-` from both ends.
pub fn project_name(root: &Path) -> String {
    let raw = root
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let mut name = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c);
        } else if !name.ends_with('-') {
            name.push('-');
        }
    }
    let name = name.trim_matches('-');
    if name.is_empty() {
        FALLBACK_PROJECT_NAME.to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_name() {
        assert_eq!(project_name(Path::new("/home/me/My Site")), "my-site");
        assert_eq!(project_name(Path::new("/tmp/drupal_cms--1.0")), "drupal-cms-1-0");
        assert_eq!(project_name(Path::new("/tmp/__")), "drupal-cms");
        assert_eq!(project_name(Path::new("/")), "drupal-cms");
    }

    #[test]
    fn test_configure_args() {
        let mut config = Config::default();
        assert_eq!(
            configure_args(&config, "site"),
            vec![
                "config",
                "--project-type=drupal11",
                "--docroot=web",
                "--project-name=site"
            ]
        );

        config.dev_tool.php_version = Some("8.3".to_string());
        assert_eq!(
            configure_args(&config, "site").last().map(String::as_str),
            Some("--php-version=8.3")
        );
    }

    #[test]
    fn test_scaffold_passes_template_verbatim() {
        assert_eq!(
            scaffold_args("drupal/cms:^1.0@dev"),
            vec!["composer", "create", "drupal/cms:^1.0@dev"]
        );
    }
}
