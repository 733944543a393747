//! The `(side, line)` key space comments are placed in.

use crate::model::{DiffFile, DiffSide, ReviewComment};
use std::collections::HashMap;

/// Placement key of an inline comment thread, rendered as `SIDE:line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordinateKey {
    pub side: DiffSide,
    pub line: u32,
}

impl CoordinateKey {
    pub fn new(side: DiffSide, line: u32) -> Self {
        Self { side, line }
    }
}

impl std::fmt::Display for CoordinateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.side, self.line)
    }
}

/// Highest known line number on each side of a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineBounds {
    pub max_add: Option<u32>,
    pub max_delete: Option<u32>,
}

impl LineBounds {
    /// Bounds from hunks, widened by the full file length once known.
    ///
    /// The region after the last hunk maps old and new lines one to one,
    /// so the old side ends at `total + deletions - additions`.
    pub fn for_file(file: &DiffFile, total_new_lines: Option<u32>) -> Self {
        let mut bounds = Self {
            max_add: file.max_hunk_line(DiffSide::Add),
            max_delete: file.max_hunk_line(DiffSide::Delete),
        };

        if let Some(total) = total_new_lines {
            bounds.max_add = Some(bounds.max_add.map_or(total, |m| m.max(total)));
            let old_total = (i64::from(total) + file.deletions as i64 - file.additions as i64)
                .clamp(0, i64::from(u32::MAX)) as u32;
            if old_total > 0 {
                bounds.max_delete = Some(bounds.max_delete.map_or(old_total, |m| m.max(old_total)));
            }
        }

        bounds
    }

    pub fn max(&self, side: DiffSide) -> Option<u32> {
        match side {
            DiffSide::Add => self.max_add,
            DiffSide::Delete => self.max_delete,
        }
    }

    /// Pin `line` to the last known line on `side`; unknown bounds leave it unchanged.
    pub fn clamp(&self, side: DiffSide, line: u32) -> u32 {
        clamp_line(line, self.max(side))
    }
}

/// Clamp a comment line to the maximum known line.
///
/// Comments anchored before a force-push may point past the end of the
/// current file; they render on the last available line instead of vanishing.
pub fn clamp_line(line: u32, max_known: Option<u32>) -> u32 {
    match max_known {
        Some(max) if line > max => max,
        _ => line,
    }
}

/// Comment threads of one file grouped by placement key.
#[derive(Debug, Clone, Default)]
pub struct CommentIndex {
    by_key: HashMap<CoordinateKey, Vec<String>>,
}

impl CommentIndex {
    /// Group the inline comments of `path` by their clamped `end_line`.
    pub fn build<'a, I>(path: &str, comments: I, bounds: LineBounds) -> Self
    where
        I: IntoIterator<Item = &'a ReviewComment>,
    {
        let mut by_key: HashMap<CoordinateKey, Vec<String>> = HashMap::new();
        for comment in comments {
            if comment.file_path() != Some(path) {
                continue;
            }
            let Some((side, end_line)) = comment.placement() else {
                continue;
            };
            let line = bounds.clamp(side, end_line);
            if line != end_line {
                log::debug!(
                    "Comment {} on {} pinned from {}:{} to {}:{}",
                    comment.id,
                    path,
                    side,
                    end_line,
                    side,
                    line
                );
            }
            by_key
                .entry(CoordinateKey::new(side, line))
                .or_default()
                .push(comment.id.clone());
        }
        Self { by_key }
    }

    /// Comment ids placed at a key, in collection order.
    pub fn at(&self, key: CoordinateKey) -> &[String] {
        self.by_key.get(&key).map_or(&[], Vec::as_slice)
    }

    /// Comment ids placed at any of `keys`, without duplicates.
    pub fn at_any(&self, keys: &[CoordinateKey]) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for key in keys {
            for id in self.at(*key) {
                if !ids.contains(id) {
                    ids.push(id.clone());
                }
            }
        }
        ids
    }

    pub fn keys(&self) -> impl Iterator<Item = &CoordinateKey> {
        self.by_key.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CommentAnchor, DiffHunk, DiffLine};
    use pretty_assertions::assert_eq;

    fn file() -> DiffFile {
        let mut file = DiffFile::new("src/lib.rs");
        let mut hunk = DiffHunk::new(28, 3, 28, 3);
        hunk.lines.push(DiffLine::context("a", 28, 28));
        hunk.lines.push(DiffLine::delete("b", 29));
        hunk.lines.push(DiffLine::delete("c", 30));
        hunk.lines.push(DiffLine::insert("d", 29));
        hunk.lines.push(DiffLine::insert("e", 30));
        file.hunks.push(hunk);
        file.recalculate_stats();
        file
    }

    #[test]
    fn test_key_format() {
        assert_eq!(CoordinateKey::new(DiffSide::Add, 12).to_string(), "ADD:12");
        assert_eq!(CoordinateKey::new(DiffSide::Delete, 3).to_string(), "DELETE:3");
    }

    #[test]
    fn test_comment_beyond_rebase_is_pinned() {
        let file = file();
        let bounds = LineBounds::for_file(&file, None);
        assert_eq!(bounds.max_delete, Some(30));

        let comment = ReviewComment::inline(
            "1",
            CommentAnchor::single("src/lib.rs", DiffSide::Delete, 42),
            "gone?",
        );
        let index = CommentIndex::build("src/lib.rs", [&comment], bounds);
        assert_eq!(index.at(CoordinateKey::new(DiffSide::Delete, 30)), ["1".to_string()]);
    }

    #[test]
    fn test_clamp_is_idempotent_in_range() {
        assert_eq!(clamp_line(10, Some(30)), 10);
        assert_eq!(clamp_line(30, Some(30)), 30);
        assert_eq!(clamp_line(31, Some(30)), 30);
        assert_eq!(clamp_line(31, None), 31);
    }

    #[test]
    fn test_bounds_widen_with_file_length() {
        let file = file();
        let bounds = LineBounds::for_file(&file, Some(100));
        assert_eq!(bounds.max_add, Some(100));
        assert_eq!(bounds.max_delete, Some(100));
    }

    #[test]
    fn test_multiline_comment_placed_at_end_line() {
        let comment = ReviewComment::inline(
            "2",
            CommentAnchor::new("src/lib.rs", DiffSide::Add, 28, 30),
            "range",
        );
        let other = ReviewComment::inline(
            "3",
            CommentAnchor::single("other.rs", DiffSide::Add, 30),
            "elsewhere",
        );
        let index = CommentIndex::build(
            "src/lib.rs",
            [&comment, &other],
            LineBounds::for_file(&file(), None),
        );
        assert!(index.at(CoordinateKey::new(DiffSide::Add, 28)).is_empty());
        assert_eq!(
            index.at_any(&[
                CoordinateKey::new(DiffSide::Add, 30),
                CoordinateKey::new(DiffSide::Delete, 30)
            ]),
            vec!["2".to_string()]
        );
    }
}
