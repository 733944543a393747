//! File content from a local checkout of the reviewed revision.

use async_trait::async_trait;
use review_diff_core::traits::{ContextError, FileContentProvider};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

pub struct LocalFileProvider {
    root: PathBuf,
}

impl LocalFileProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Join a diff path onto the root, refusing anything that escapes it.
    fn resolve(&self, path: &str) -> Result<PathBuf, ContextError> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ContextError::FileNotFound(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FileContentProvider for LocalFileProvider {
    async fn fetch_file(&self, path: &str) -> Result<String, ContextError> {
        let full_path = self.resolve(path)?;
        log::debug!("Reading {}", full_path.display());

        match tokio::fs::read_to_string(&full_path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ContextError::FileNotFound(path.to_string()))
            }
            Err(e) => Err(ContextError::FetchFailed(format!("{}: {}", path, e))),
        }
    }

    fn is_available(&self) -> bool {
        self.root.is_dir()
    }
}
