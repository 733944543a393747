//! Collaborator traits: where the engine meets the network layer.

mod comment_handler;
mod context_provider;

pub use comment_handler::{
    run_mutation, CommentError, CommentHandler, CommentId, CommentMutation, CommentTarget,
    NoOpCommentHandler,
};
pub use context_provider::{ContextError, FileContentProvider, NoOpContentProvider};
