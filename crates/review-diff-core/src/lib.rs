//! # review-diff-core
//!
//! Diff reconstruction and annotation engine for code review surfaces:
//! gapless file views built from sparse hunks, incremental context
//! expansion, per-line syntax highlighting, split-view pairing and a stable
//! comment coordinate model.
//!
//! ## Design Principles
//!
//! This crate is **instrumented**: it receives data and emits events without
//! calling external APIs. File content and comment mutations go through the
//! [`FileContentProvider`] and [`CommentHandler`] traits, implemented by the
//! orchestrating application.
//!
//! ## Action-Based Architecture
//!
//! The orchestrator maps clicks and keys to [`ViewAction`] variants and
//! dispatches them to a [`ReviewSession`]. The returned [`ViewEvent`]s tell
//! it which I/O to perform; results are fed back in.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use review_diff_core::{FetchQueue, ReviewSession, SessionOptions, ViewAction, ViewEvent};
//!
//! let mut session = ReviewSession::new(diff, SessionOptions::default());
//! session.load_comments(Ok(comments));
//! let (queue, mut results) = FetchQueue::spawn(provider, 3);
//!
//! session.mount("src/lib.rs")?;
//! for event in session.handle_action("src/lib.rs", ViewAction::ExpandDown(1))? {
//!     if let ViewEvent::FileContentRequested(request) = event {
//!         queue.submit(request);
//!     }
//! }
//! while let Some(result) = results.recv().await {
//!     session.apply_file_content(result);
//! }
//! ```

pub mod action;
pub mod annotate;
pub mod event;
pub mod fetch;
pub mod highlight;
pub mod model;
pub mod parser;
pub mod render;
pub mod state;
pub mod traits;

// Re-export commonly used types
pub use action::ViewAction;
pub use event::ViewEvent;
pub use fetch::{
    FetchQueue, FileContentRequest, FileContentResult, LoadToken, DEFAULT_FETCH_CONCURRENCY,
};
pub use highlight::DiffHighlighter;
pub use model::{
    CommentAnchor, CommentsResponse, DiffFile, DiffHunk, DiffLine, DiffSide, FullDiff, Gap,
    LineKind, ReviewComment,
};
pub use parser::parse_unified_diff;
pub use render::{MatchSequence, ViewMode};
pub use state::{ReviewSession, SessionError, SessionOptions};
pub use traits::{
    CommentError, CommentHandler, ContextError, FileContentProvider, NoOpCommentHandler,
    NoOpContentProvider,
};
