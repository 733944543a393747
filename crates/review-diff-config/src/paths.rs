//! Configuration and data directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/review-diff/`, `~/.cache/review-diff/`
//! - macOS: `~/Library/Application Support/review-diff/`, `~/Library/Caches/review-diff/`
//! - Windows: `%APPDATA%\review-diff\`, `%LOCALAPPDATA%\review-diff\`

use anyhow::{Context, Result};
use std::path::PathBuf;

pub(crate) const APP_NAME: &str = "review-diff";
const VIEWED_DIR: &str = "viewed";

/// Get the application config directory
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the application cache directory (log files in release builds)
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get path to the viewed-state file of one review task
///
/// Returns `<config_dir>/viewed/<project>/<task>.json`.
pub fn viewed_state_path(project: &str, task: &str) -> Result<PathBuf> {
    Ok(config_dir()?
        .join(VIEWED_DIR)
        .join(storage_component(project))
        .join(format!("{}.json", storage_component(task))))
}

/// Make an identifier safe to use as a single path component.
pub fn storage_component(id: &str) -> String {
    let cleaned: String = id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    match cleaned.trim_matches('.') {
        "" => "_".to_string(),
        _ => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_exists() {
        let dir = config_dir().unwrap();
        assert!(dir.exists());
        assert!(dir.ends_with(APP_NAME));
    }

    #[test]
    fn test_viewed_state_path() {
        let path = viewed_state_path("acme/web", "task 42").unwrap();
        assert!(path.ends_with("viewed/acme_web/task_42.json"));
    }

    #[test]
    fn test_storage_component() {
        assert_eq!(storage_component("backend"), "backend");
        assert_eq!(storage_component("feature/login"), "feature_login");
        assert_eq!(storage_component(".."), "_");
        assert_eq!(storage_component(""), "_");
    }
}
