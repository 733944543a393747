//! Diff data structures: files, hunks and lines as delivered by the diff endpoint.

use super::comment::{DiffSide, ReviewComment};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The full diff of a review session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullDiff {
    /// All files in the diff, keyed by `new_path`.
    #[serde(default)]
    pub files: Vec<DiffFile>,
    /// Total additions across all files.
    #[serde(default)]
    pub total_additions: usize,
    /// Total deletions across all files.
    #[serde(default)]
    pub total_deletions: usize,
}

impl FullDiff {
    /// Create an empty diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recalculate totals from files.
    pub fn recalculate_totals(&mut self) {
        self.total_additions = self.files.iter().map(|f| f.additions).sum();
        self.total_deletions = self.files.iter().map(|f| f.deletions).sum();
    }

    /// Look up a file by its new path.
    pub fn file(&self, path: &str) -> Option<&DiffFile> {
        self.files.iter().find(|f| f.new_path == path)
    }

    /// Append a virtual file for every comment path that has no diff entry.
    ///
    /// Project-level comments carry no path and never produce a file.
    pub fn with_virtual_files(mut self, comments: &[ReviewComment]) -> Self {
        let mut known: HashSet<String> = self.files.iter().map(|f| f.new_path.clone()).collect();
        for comment in comments {
            let Some(path) = comment.file_path() else {
                continue;
            };
            if known.insert(path.to_string()) {
                log::debug!("Synthesizing virtual file for commented path {}", path);
                self.files.push(DiffFile::virtual_file(path));
            }
        }
        self
    }
}

/// How a file changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Modified,
    Deleted,
    Renamed,
}

impl ChangeType {
    /// Get a single-character representation.
    pub fn as_char(&self) -> char {
        match self {
            ChangeType::Added => 'A',
            ChangeType::Modified => 'M',
            ChangeType::Deleted => 'D',
            ChangeType::Renamed => 'R',
        }
    }
}

/// A single file's diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffFile {
    /// Path before the change (equal to `new_path` unless renamed).
    #[serde(default)]
    pub old_path: String,
    /// Path after the change.
    pub new_path: String,
    pub change_type: ChangeType,
    /// Change hunks, sorted by ascending `new_start`.
    #[serde(default)]
    pub hunks: Vec<DiffHunk>,
    #[serde(default)]
    pub is_binary: bool,
    #[serde(default)]
    pub additions: usize,
    #[serde(default)]
    pub deletions: usize,
    /// Synthesized for a commented path with no diff entry.
    #[serde(default)]
    pub is_virtual: bool,
}

impl DiffFile {
    /// Create a modified file with no hunks.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            old_path: path.clone(),
            new_path: path,
            change_type: ChangeType::Modified,
            hunks: Vec::new(),
            is_binary: false,
            additions: 0,
            deletions: 0,
            is_virtual: false,
        }
    }

    /// Create a virtual file entry. Virtual files are never binary.
    pub fn virtual_file(path: impl Into<String>) -> Self {
        Self {
            is_virtual: true,
            ..Self::new(path)
        }
    }

    /// Display name, showing both paths for renames.
    pub fn display_name(&self) -> String {
        if !self.old_path.is_empty() && self.old_path != self.new_path {
            format!("{} → {}", self.old_path, self.new_path)
        } else {
            self.new_path.clone()
        }
    }

    /// A file with no hunks renders as "no content changes".
    pub fn has_content_changes(&self) -> bool {
        !self.hunks.is_empty()
    }

    /// Recalculate line statistics from hunks.
    pub fn recalculate_stats(&mut self) {
        let lines = || self.hunks.iter().flat_map(|h| &h.lines);
        self.additions = lines().filter(|l| l.kind == LineKind::Insert).count();
        self.deletions = lines().filter(|l| l.kind == LineKind::Delete).count();
    }

    /// Highest line number present in any hunk on the given side.
    pub fn max_hunk_line(&self, side: DiffSide) -> Option<u32> {
        self.hunks
            .iter()
            .flat_map(|h| h.lines.iter())
            .filter_map(|l| l.line_on(side))
            .max()
    }

    /// Last new-side line covered by the final hunk.
    pub fn last_hunk_new_line(&self) -> Option<u32> {
        self.hunks.last().map(DiffHunk::new_end)
    }
}

/// A contiguous region of changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffHunk {
    pub old_start: u32,
    pub old_lines: u32,
    pub new_start: u32,
    pub new_lines: u32,
    /// Header line, e.g. `@@ -10,5 +10,7 @@ fn example()`.
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub lines: Vec<DiffLine>,
}

impl DiffHunk {
    /// Create a hunk with a generated header.
    pub fn new(old_start: u32, old_lines: u32, new_start: u32, new_lines: u32) -> Self {
        Self {
            header: format!(
                "@@ -{},{} +{},{} @@",
                old_start, old_lines, new_start, new_lines
            ),
            old_start,
            old_lines,
            new_start,
            new_lines,
            lines: Vec::new(),
        }
    }

    /// Create a hunk with a section heading appended to the header.
    pub fn with_section(
        old_start: u32,
        old_lines: u32,
        new_start: u32,
        new_lines: u32,
        section: &str,
    ) -> Self {
        let mut hunk = Self::new(old_start, old_lines, new_start, new_lines);
        if !section.is_empty() {
            hunk.header = format!("{} {}", hunk.header, section);
        }
        hunk
    }

    /// Last new-side line covered by this hunk.
    pub fn new_end(&self) -> u32 {
        (self.new_start + self.new_lines).saturating_sub(1)
    }

    /// First new-side line after this hunk.
    pub fn new_after(&self) -> u32 {
        self.new_start + self.new_lines
    }

    /// First old-side line after this hunk.
    pub fn old_after(&self) -> u32 {
        self.old_start + self.old_lines
    }
}

/// A single line in a hunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    #[serde(alias = "type")]
    pub kind: LineKind,
    #[serde(default)]
    pub old_line: Option<u32>,
    #[serde(default)]
    pub new_line: Option<u32>,
    /// Content without the leading `+`/`-`/` ` marker.
    #[serde(default)]
    pub content: String,
}

impl DiffLine {
    /// Create a context line.
    pub fn context(content: impl Into<String>, old_line: u32, new_line: u32) -> Self {
        Self {
            kind: LineKind::Context,
            content: content.into(),
            old_line: Some(old_line),
            new_line: Some(new_line),
        }
    }

    /// Create an inserted line.
    pub fn insert(content: impl Into<String>, new_line: u32) -> Self {
        Self {
            kind: LineKind::Insert,
            content: content.into(),
            old_line: None,
            new_line: Some(new_line),
        }
    }

    /// Create a deleted line.
    pub fn delete(content: impl Into<String>, old_line: u32) -> Self {
        Self {
            kind: LineKind::Delete,
            content: content.into(),
            old_line: Some(old_line),
            new_line: None,
        }
    }

    /// Line number on the given side, if the line exists there.
    pub fn line_on(&self, side: DiffSide) -> Option<u32> {
        match side {
            DiffSide::Add => self.new_line,
            DiffSide::Delete => self.old_line,
        }
    }

    /// Side used when this line is anchored on its own.
    pub fn primary_side(&self) -> DiffSide {
        match self.kind {
            LineKind::Delete => DiffSide::Delete,
            LineKind::Insert | LineKind::Context => DiffSide::Add,
        }
    }

    /// Whether the line numbers agree with the line kind.
    pub fn is_well_formed(&self) -> bool {
        match self.kind {
            LineKind::Context => self.old_line.is_some() && self.new_line.is_some(),
            LineKind::Insert => self.old_line.is_none() && self.new_line.is_some(),
            LineKind::Delete => self.old_line.is_some() && self.new_line.is_none(),
        }
    }
}

/// Line type in a hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Context,
    Insert,
    Delete,
}

impl LineKind {
    /// Get the marker character for this line type.
    pub fn prefix(&self) -> char {
        match self {
            LineKind::Context => ' ',
            LineKind::Insert => '+',
            LineKind::Delete => '-',
        }
    }

    /// CSS class used by the row renderers.
    pub fn css_class(&self) -> &'static str {
        match self {
            LineKind::Context => "line-context",
            LineKind::Insert => "line-insert",
            LineKind::Delete => "line-delete",
        }
    }
}
