//! Persisted "viewed" checkbox state
//!
//! One JSON file per review task, mapping file paths to the content hash
//! recorded when the file was marked viewed:
//!
//! `<config_dir>/viewed/<project>/<task>.json`

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

const VIEWED_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewedMeta {
    pub last_modified: DateTime<Utc>,
    pub version: u32,
}

impl Default for ViewedMeta {
    fn default() -> Self {
        Self {
            last_modified: Utc::now(),
            version: VIEWED_VERSION,
        }
    }
}

/// File contents of a viewed-state file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewedState {
    #[serde(default)]
    pub meta: ViewedMeta,
    /// Path -> content hash at the time it was marked viewed
    #[serde(default)]
    pub files: BTreeMap<String, u32>,
}

/// Viewed state of one review task bound to its file on disk.
#[derive(Debug, Clone)]
pub struct ViewedStore {
    path: PathBuf,
    state: ViewedState,
}

impl ViewedStore {
    /// Open the store for `project`/`task`; a missing file starts empty.
    pub fn open(project: &str, task: &str) -> Result<Self> {
        let path = paths::viewed_state_path(project, task)?;
        Self::open_at(path)
    }

    /// Open the store at a specific path.
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = if path.exists() {
            let state = Self::load_from_path(&path)?;
            log::info!("Loaded {} viewed entries from {:?}", state.files.len(), path);
            state
        } else {
            log::debug!("No viewed state at {:?}, starting empty", path);
            ViewedState::default()
        };
        Ok(Self { path, state })
    }

    fn load_from_path(path: &Path) -> Result<ViewedState> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read viewed state file: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse viewed state file: {:?}", path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, file_path: &str) -> Option<u32> {
        self.state.files.get(file_path).copied()
    }

    pub fn len(&self) -> usize {
        self.state.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.files.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, u32)> {
        self.state.files.iter().map(|(path, hash)| (path.as_str(), *hash))
    }

    pub fn set(&mut self, file_path: &str, hash: u32) {
        self.state.files.insert(file_path.to_string(), hash);
    }

    pub fn remove(&mut self, file_path: &str) -> Option<u32> {
        self.state.files.remove(file_path)
    }

    /// Replace every entry, e.g. with the map a review session ended with.
    pub fn replace_all(&mut self, files: &HashMap<String, u32>) {
        self.state.files = files.iter().map(|(k, v)| (k.clone(), *v)).collect();
    }

    /// Entries in the shape a review session is seeded with.
    pub fn to_map(&self) -> HashMap<String, u32> {
        self.state
            .files
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }

    pub fn save(&mut self) -> Result<()> {
        self.state.meta.last_modified = Utc::now();

        let content =
            serde_json::to_string_pretty(&self.state).context("Failed to serialize viewed state")?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write viewed state file: {:?}", self.path))?;

        log::info!("Saved viewed state to {:?}", self.path);
        Ok(())
    }
}
