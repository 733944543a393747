//! Data models for diffs, gaps and review comments.

mod comment;
mod diff;
mod gap;

pub use comment::{
    CommentAnchor, CommentKind, CommentShapeError, CommentStatus, CommentType, CommentsResponse,
    DiffSide, Reply, ReviewComment, ReviewCommentEntry,
};
pub use diff::{ChangeType, DiffFile, DiffHunk, DiffLine, FullDiff, LineKind};
pub use gap::{compute_gaps, gap_at, Gap};
