//! Path resolution utilities for CLI commands
//!
//! Root resolution plus helpers for turning CLI paths into config values.

use std::env;
use std::path::{Path, PathBuf};

/// Resolve the root directory for config discovery and relative paths.
///
/// If a root path is provided, returns it. Otherwise, falls back to the
/// current working directory, or "." if that cannot be determined.
pub fn resolve_root_path(root: Option<PathBuf>) -> PathBuf {
    root.unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Render a CLI path as a config path string
pub fn config_path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_resolve_with_explicit_path() {
        let explicit = PathBuf::from("/tmp/test/path");
        let result = resolve_root_path(Some(explicit.clone()));
        assert_eq!(result, explicit);
    }

    #[test]
    fn test_resolve_without_path_uses_current_dir() {
        // When no path is provided, should fall back to current_dir or "."
        let result = resolve_root_path(None);
        // Result should either be current_dir or "."
        if let Ok(current) = env::current_dir() {
            assert!(result == current || result == PathBuf::from("."));
        } else {
            assert_eq!(result, PathBuf::from("."));
        }
    }

    #[test]
    fn test_config_path_string_keeps_relative_paths() {
        assert_eq!(
            config_path_string(Path::new("data/export.json")),
            "data/export.json"
        );
    }
}
