//! Application configuration
//!
//! Configuration loaded from `.review-diff.toml`.

use review_diff_core::render::ViewMode;
use review_diff_core::state::DEFAULT_EXPAND_STEP;
use review_diff_core::DEFAULT_FETCH_CONCURRENCY;
use serde::{Deserialize, Serialize};

/// Application configuration loaded from `.review-diff.toml`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Lines revealed per "expand up/down" click
    #[serde(default = "default_expand_step")]
    pub expand_step: u32,

    /// Maximum number of file contents fetched at the same time
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,

    /// syntect theme used for the highlight stylesheet
    #[serde(default = "default_highlight_theme")]
    pub highlight_theme: String,

    #[serde(default = "default_true")]
    pub syntax_highlighting: bool,

    #[serde(default)]
    pub view_mode: ViewMode,

    /// Collapse resolved comment threads the first time they are seen
    #[serde(default = "default_true")]
    pub collapse_resolved: bool,
}

fn default_expand_step() -> u32 {
    DEFAULT_EXPAND_STEP
}

fn default_fetch_concurrency() -> usize {
    DEFAULT_FETCH_CONCURRENCY
}

fn default_highlight_theme() -> String {
    "base16-ocean.dark".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            expand_step: default_expand_step(),
            fetch_concurrency: default_fetch_concurrency(),
            highlight_theme: default_highlight_theme(),
            syntax_highlighting: true,
            view_mode: ViewMode::default(),
            collapse_resolved: true,
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }
}
