//! Loading diffs and comments from disk.

use anyhow::{Context, Result};
use review_diff_core::traits::CommentError;
use review_diff_core::{parse_unified_diff, CommentsResponse, FullDiff};
use std::path::Path;

/// Load a diff from either the review API JSON shape or unified diff text.
pub fn load_diff(path: &Path) -> Result<FullDiff> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read diff file: {:?}", path))?;
    parse_diff(&content).with_context(|| format!("Failed to load diff from {:?}", path))
}

fn parse_diff(content: &str) -> Result<FullDiff> {
    if content.trim_start().starts_with('{') {
        let mut diff: FullDiff =
            serde_json::from_str(content).context("Invalid diff JSON")?;
        diff.recalculate_totals();
        Ok(diff)
    } else {
        Ok(parse_unified_diff(content)?)
    }
}

/// Load a comments response. Errors take the shape a comment backend reports.
pub fn load_comments(path: &Path) -> Result<CommentsResponse, CommentError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CommentError::RequestFailed(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| CommentError::Rejected(format!("{}: {}", path.display(), e)))
}
