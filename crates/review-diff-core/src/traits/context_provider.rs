//! Trait for fetching full file content.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when fetching file content.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContextError {
    /// The requested file was not found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// A network or I/O error occurred.
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    /// The provider is not available.
    #[error("Content provider unavailable: {0}")]
    Unavailable(String),
}

/// Provides the full text of a file in the reviewed revision.
///
/// Gap expansion needs the lines the diff payload omitted. The viewer never
/// fetches on its own; it emits requests and an implementation of this trait
/// (usually behind a [`crate::FetchQueue`]) fulfills them.
///
/// # Example
///
/// ```ignore
/// struct ApiContentProvider {
///     client: ApiClient,
///     project: String,
///     task: String,
/// }
///
/// #[async_trait]
/// impl FileContentProvider for ApiContentProvider {
///     async fn fetch_file(&self, path: &str) -> Result<String, ContextError> {
///         self.client
///             .file_content(&self.project, &self.task, path)
///             .await
///             .map_err(|e| ContextError::FetchFailed(e.to_string()))
///     }
///
///     fn is_available(&self) -> bool {
///         true
///     }
/// }
/// ```
#[async_trait]
pub trait FileContentProvider: Send + Sync {
    /// Fetch the complete text of `path`.
    async fn fetch_file(&self, path: &str) -> Result<String, ContextError>;

    /// Check if the provider is available.
    fn is_available(&self) -> bool;
}

/// A provider for when full-file content is not reachable.
///
/// Every fetch fails, so expanded gaps show placeholder lines.
pub struct NoOpContentProvider;

#[async_trait]
impl FileContentProvider for NoOpContentProvider {
    async fn fetch_file(&self, _path: &str) -> Result<String, ContextError> {
        Err(ContextError::Unavailable(
            "File content is not available".to_string(),
        ))
    }

    fn is_available(&self) -> bool {
        false
    }
}
