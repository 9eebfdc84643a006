//! # Host Tool Detection (`common::system`)
//!
//! File: cli/src/common/system/mod.rs
//!
//! ## Overview
//!
//! Checks whether the external tools the launcher depends on are present on
//! the host. A tool is given either as a bare name, which is searched for on
//! `PATH` with the `which` crate, or as a path (anything containing a path
//! separator), which must point at an existing file.
//!
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves `program` to the executable that would be run, if any.
pub fn find_tool(program: &str) -> Option<PathBuf> {
    if program.contains(std::path::MAIN_SEPARATOR) || program.contains('/') {
        let path = Path::new(program);
        return if path.is_file() {
            debug!("Using configured tool path {}", path.display());
            Some(path.to_path_buf())
        } else {
            debug!("Configured tool path {} does not exist", path.display());
            None
        };
    }

    match which::which(program) {
        Ok(found) => {
            debug!("Found '{}' at {}", program, found.display());
            Some(found)
        }
        Err(e) => {
            debug!("'{}' not found on PATH: {}", program, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[cfg(unix)]
    #[test]
    fn test_find_tool_on_path() {
        // `sh` is present on every unix host the tests run on.
        assert!(find_tool("sh").is_some());
        assert!(find_tool("launcher-test-no-such-tool-98765").is_none());
    }

    #[test]
    fn test_find_tool_by_path() {
        let dir = tempdir().unwrap();
        let tool = dir.path().join("ddev");
        std::fs::write(&tool, "").unwrap();

        let as_str = tool.to_string_lossy().into_owned();
        assert_eq!(find_tool(&as_str), Some(tool.clone()));

        let missing = dir.path().join("missing").to_string_lossy().into_owned();
        assert!(find_tool(&missing).is_none());
    }
}
