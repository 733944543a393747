//! Trait for review comment mutations.

use crate::model::{CommentAnchor, CommentsResponse};
use async_trait::async_trait;
use thiserror::Error;

/// Server-side identifier of a comment.
pub type CommentId = String;

/// Errors that can occur during comment operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommentError {
    /// The request failed in transit.
    #[error("Comment request failed: {0}")]
    RequestFailed(String),

    /// The server rejected the payload.
    #[error("Comment rejected: {0}")]
    Rejected(String),

    /// The comment was not found.
    #[error("Comment not found: {0}")]
    NotFound(CommentId),

    /// The comment handler is not available.
    #[error("Comment handler unavailable: {0}")]
    Unavailable(String),
}

/// What a new comment attaches to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentTarget {
    Inline(CommentAnchor),
    File { file_path: String },
    Project,
}

/// A comment mutation issued by the review surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentMutation {
    Create { target: CommentTarget, content: String },
    Reply { id: CommentId, content: String },
    Resolve(CommentId),
    Reopen(CommentId),
    Edit { id: CommentId, content: String },
    Delete(CommentId),
}

/// Performs comment CRUD against the review backend.
///
/// Every operation answers with the *entire* updated comment collection,
/// which replaces the local one.
#[async_trait]
pub trait CommentHandler: Send + Sync {
    async fn create(
        &self,
        target: CommentTarget,
        content: String,
    ) -> Result<CommentsResponse, CommentError>;

    async fn reply(&self, id: CommentId, content: String)
        -> Result<CommentsResponse, CommentError>;

    async fn resolve(&self, id: CommentId) -> Result<CommentsResponse, CommentError>;

    async fn reopen(&self, id: CommentId) -> Result<CommentsResponse, CommentError>;

    async fn edit(&self, id: CommentId, content: String) -> Result<CommentsResponse, CommentError>;

    async fn delete(&self, id: CommentId) -> Result<CommentsResponse, CommentError>;

    /// Check if the handler is available.
    fn is_available(&self) -> bool;
}

/// Dispatch a mutation to the matching handler method.
pub async fn run_mutation(
    handler: &dyn CommentHandler,
    mutation: CommentMutation,
) -> Result<CommentsResponse, CommentError> {
    log::debug!("Running comment mutation {:?}", mutation);
    match mutation {
        CommentMutation::Create { target, content } => handler.create(target, content).await,
        CommentMutation::Reply { id, content } => handler.reply(id, content).await,
        CommentMutation::Resolve(id) => handler.resolve(id).await,
        CommentMutation::Reopen(id) => handler.reopen(id).await,
        CommentMutation::Edit { id, content } => handler.edit(id, content).await,
        CommentMutation::Delete(id) => handler.delete(id).await,
    }
}

/// A handler for read-only sessions.
pub struct NoOpCommentHandler;

impl NoOpCommentHandler {
    fn disabled<T>(what: &str) -> Result<T, CommentError> {
        Err(CommentError::Unavailable(format!("{} is disabled", what)))
    }
}

#[async_trait]
impl CommentHandler for NoOpCommentHandler {
    async fn create(
        &self,
        _target: CommentTarget,
        _content: String,
    ) -> Result<CommentsResponse, CommentError> {
        Self::disabled("Comment creation")
    }

    async fn reply(
        &self,
        _id: CommentId,
        _content: String,
    ) -> Result<CommentsResponse, CommentError> {
        Self::disabled("Replying")
    }

    async fn resolve(&self, _id: CommentId) -> Result<CommentsResponse, CommentError> {
        Self::disabled("Resolving")
    }

    async fn reopen(&self, _id: CommentId) -> Result<CommentsResponse, CommentError> {
        Self::disabled("Reopening")
    }

    async fn edit(
        &self,
        _id: CommentId,
        _content: String,
    ) -> Result<CommentsResponse, CommentError> {
        Self::disabled("Comment editing")
    }

    async fn delete(&self, _id: CommentId) -> Result<CommentsResponse, CommentError> {
        Self::disabled("Comment deletion")
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_handler_rejects_mutations() {
        let handler = NoOpCommentHandler;
        let result = run_mutation(&handler, CommentMutation::Resolve("1".to_string())).await;
        assert_eq!(
            result,
            Err(CommentError::Unavailable("Resolving is disabled".to_string()))
        );
        assert!(!handler.is_available());
    }
}
