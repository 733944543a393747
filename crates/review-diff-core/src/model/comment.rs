//! Review comment data structures.
//!
//! Comments arrive as flat wire entries where `comment_type` decides which
//! fields are meaningful. They are converted into [`ReviewComment`] whose
//! [`CommentKind`] only carries the fields valid for that kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which version of a line a coordinate refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiffSide {
    /// New file (right column).
    #[serde(rename = "ADD")]
    Add,
    /// Old file (left column).
    #[serde(rename = "DELETE")]
    Delete,
}

impl DiffSide {
    /// Wire representation.
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            DiffSide::Add => "ADD",
            DiffSide::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for DiffSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

/// A request to create a comment on a line range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAnchor {
    pub file_path: String,
    pub side: DiffSide,
    pub start_line: u32,
    pub end_line: u32,
}

impl CommentAnchor {
    /// Create an anchor, normalizing the range so `start_line <= end_line`.
    pub fn new(file_path: impl Into<String>, side: DiffSide, a: u32, b: u32) -> Self {
        Self {
            file_path: file_path.into(),
            side,
            start_line: a.min(b),
            end_line: a.max(b),
        }
    }

    /// Create a single-line anchor.
    pub fn single(file_path: impl Into<String>, side: DiffSide, line: u32) -> Self {
        Self::new(file_path, side, line, line)
    }

    pub fn is_multiline(&self) -> bool {
        self.start_line != self.end_line
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    Open,
    Resolved,
    Outdated,
}

/// Wire discriminator for [`CommentKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentType {
    Inline,
    File,
    Project,
}

/// Where a comment is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentKind {
    /// Attached to a line range; placed at `end_line`.
    Inline {
        file_path: String,
        side: DiffSide,
        start_line: u32,
        end_line: u32,
    },
    /// Attached to a whole file.
    File { file_path: String },
    /// Attached to the review as a whole.
    Project,
}

/// A reply in a comment thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A review comment thread root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewComment {
    pub id: String,
    pub kind: CommentKind,
    pub status: CommentStatus,
    pub content: String,
    pub replies: Vec<Reply>,
    pub author: Option<String>,
    pub author_avatar_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl ReviewComment {
    /// Create an open inline comment (mainly for tests and fixtures).
    pub fn inline(
        id: impl Into<String>,
        anchor: CommentAnchor,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: CommentKind::Inline {
                file_path: anchor.file_path,
                side: anchor.side,
                start_line: anchor.start_line,
                end_line: anchor.end_line,
            },
            status: CommentStatus::Open,
            content: content.into(),
            replies: Vec::new(),
            author: None,
            author_avatar_url: None,
            created_at: None,
        }
    }

    /// Path the comment refers to, if any.
    pub fn file_path(&self) -> Option<&str> {
        match &self.kind {
            CommentKind::Inline { file_path, .. } | CommentKind::File { file_path } => {
                Some(file_path)
            }
            CommentKind::Project => None,
        }
    }

    /// Placement coordinate `(side, end_line)` for inline comments.
    pub fn placement(&self) -> Option<(DiffSide, u32)> {
        match self.kind {
            CommentKind::Inline { side, end_line, .. } => Some((side, end_line)),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status == CommentStatus::Resolved
    }
}

/// Errors raised when a wire entry does not fit its declared comment type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommentShapeError {
    #[error("Inline comment {0} has no side")]
    MissingSide(String),

    #[error("Inline comment {0} has no end line")]
    MissingEndLine(String),

    #[error("Comment {0} has no file path")]
    MissingPath(String),
}

/// A comment entry as delivered by the comments endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCommentEntry {
    pub id: String,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub side: Option<DiffSide>,
    #[serde(default)]
    pub start_line: Option<u32>,
    #[serde(default)]
    pub end_line: Option<u32>,
    pub status: CommentStatus,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub replies: Vec<Reply>,
    pub comment_type: CommentType,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub author_avatar_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl TryFrom<ReviewCommentEntry> for ReviewComment {
    type Error = CommentShapeError;

    fn try_from(entry: ReviewCommentEntry) -> Result<Self, Self::Error> {
        let kind = match entry.comment_type {
            CommentType::Project => CommentKind::Project,
            CommentType::File => CommentKind::File {
                file_path: entry
                    .file_path
                    .ok_or_else(|| CommentShapeError::MissingPath(entry.id.clone()))?,
            },
            CommentType::Inline => {
                let file_path = entry
                    .file_path
                    .ok_or_else(|| CommentShapeError::MissingPath(entry.id.clone()))?;
                let side = entry
                    .side
                    .ok_or_else(|| CommentShapeError::MissingSide(entry.id.clone()))?;
                let end_line = entry
                    .end_line
                    .ok_or_else(|| CommentShapeError::MissingEndLine(entry.id.clone()))?;
                let start_line = entry.start_line.unwrap_or(end_line);
                CommentKind::Inline {
                    file_path,
                    side,
                    start_line: start_line.min(end_line),
                    end_line: start_line.max(end_line),
                }
            }
        };

        Ok(Self {
            id: entry.id,
            kind,
            status: entry.status,
            content: entry.content,
            replies: entry.replies,
            author: entry.author,
            author_avatar_url: entry.author_avatar_url,
            created_at: entry.created_at,
        })
    }
}

impl From<ReviewComment> for ReviewCommentEntry {
    fn from(comment: ReviewComment) -> Self {
        let (comment_type, file_path, side, start_line, end_line) = match comment.kind {
            CommentKind::Inline {
                file_path,
                side,
                start_line,
                end_line,
            } => (
                CommentType::Inline,
                Some(file_path),
                Some(side),
                Some(start_line),
                Some(end_line),
            ),
            CommentKind::File { file_path } => {
                (CommentType::File, Some(file_path), None, None, None)
            }
            CommentKind::Project => (CommentType::Project, None, None, None, None),
        };

        Self {
            id: comment.id,
            file_path,
            side,
            start_line,
            end_line,
            status: comment.status,
            content: comment.content,
            replies: comment.replies,
            comment_type,
            author: comment.author,
            author_avatar_url: comment.author_avatar_url,
            created_at: comment.created_at,
        }
    }
}

/// Response body of the comments endpoint and of every comment mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentsResponse {
    #[serde(default)]
    pub comments: Vec<ReviewCommentEntry>,
    #[serde(default)]
    pub open_count: usize,
    #[serde(default)]
    pub resolved_count: usize,
    #[serde(default)]
    pub not_resolved_count: usize,
}

impl CommentsResponse {
    /// Convert every entry into its typed form. One malformed entry fails the batch.
    pub fn into_comments(self) -> Result<Vec<ReviewComment>, CommentShapeError> {
        self.comments
            .into_iter()
            .map(ReviewComment::try_from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(comment_type: CommentType) -> ReviewCommentEntry {
        ReviewCommentEntry {
            id: "c1".to_string(),
            file_path: Some("src/lib.rs".to_string()),
            side: Some(DiffSide::Add),
            start_line: Some(12),
            end_line: Some(10),
            status: CommentStatus::Open,
            content: "looks off".to_string(),
            replies: Vec::new(),
            comment_type,
            author: Some("sam".to_string()),
            author_avatar_url: None,
            created_at: None,
        }
    }

    #[test]
    fn test_anchor_normalizes_range() {
        let anchor = CommentAnchor::new("a.rs", DiffSide::Delete, 20, 10);
        assert_eq!(anchor.start_line, 10);
        assert_eq!(anchor.end_line, 20);
        assert!(anchor.is_multiline());
        assert!(!CommentAnchor::single("a.rs", DiffSide::Add, 3).is_multiline());
    }

    #[test]
    fn test_inline_entry_conversion() {
        let comment = ReviewComment::try_from(entry(CommentType::Inline)).unwrap();
        assert_eq!(
            comment.kind,
            CommentKind::Inline {
                file_path: "src/lib.rs".to_string(),
                side: DiffSide::Add,
                start_line: 10,
                end_line: 12,
            }
        );
        assert_eq!(comment.placement(), Some((DiffSide::Add, 12)));
    }

    #[test]
    fn test_file_and_project_entries_drop_coordinates() {
        let file = ReviewComment::try_from(entry(CommentType::File)).unwrap();
        assert_eq!(file.placement(), None);
        assert_eq!(file.file_path(), Some("src/lib.rs"));

        let project = ReviewComment::try_from(entry(CommentType::Project)).unwrap();
        assert_eq!(project.kind, CommentKind::Project);
        assert_eq!(project.file_path(), None);
    }

    #[test]
    fn test_inline_entry_without_side_is_rejected() {
        let mut e = entry(CommentType::Inline);
        e.side = None;
        assert_eq!(
            ReviewComment::try_from(e),
            Err(CommentShapeError::MissingSide("c1".to_string()))
        );
    }

    #[test]
    fn test_decode_comments_response() {
        let json = r#"{
            "comments": [{
                "id": "7",
                "file_path": "src/main.rs",
                "side": "DELETE",
                "start_line": 4,
                "end_line": 6,
                "status": "resolved",
                "content": "why?",
                "comment_type": "inline",
                "replies": [{"id": "8", "content": "because"}]
            }],
            "open_count": 0,
            "resolved_count": 1,
            "not_resolved_count": 0
        }"#;

        let response: CommentsResponse = serde_json::from_str(json).unwrap();
        let comments = response.into_comments().unwrap();
        assert_eq!(comments.len(), 1);
        assert!(comments[0].is_resolved());
        assert_eq!(comments[0].placement(), Some((DiffSide::Delete, 6)));
        assert_eq!(comments[0].replies[0].content, "because");
    }
}
