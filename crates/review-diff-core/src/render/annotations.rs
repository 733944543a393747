//! Comment threads attached to rendered lines.

use crate::annotate::{CommentIndex, CoordinateKey, LineBounds};
use crate::model::{DiffLine, DiffSide, Gap, LineKind};
use crate::state::{CommentStore, FileView, GutterIndicator, LineRange};

/// Threads on one rendered cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineComments {
    pub ids: Vec<String>,
    pub gutter: Option<GutterIndicator>,
}

pub(crate) struct Annotator<'a> {
    index: CommentIndex,
    store: &'a CommentStore,
}

impl<'a> Annotator<'a> {
    pub fn new(view: &FileView, store: &'a CommentStore) -> Self {
        let bounds = LineBounds::for_file(view.file(), view.total_lines());
        Self {
            index: CommentIndex::build(view.path(), store.inline_for(view.path()), bounds),
            store,
        }
    }

    /// Threads for a unified row. Context lines collect both sides.
    pub fn for_line(&self, line: &DiffLine) -> LineComments {
        let mut keys = Vec::with_capacity(2);
        if line.kind != LineKind::Delete {
            keys.extend(line.new_line.map(|n| CoordinateKey::new(DiffSide::Add, n)));
        }
        if line.kind != LineKind::Insert {
            keys.extend(line.old_line.map(|n| CoordinateKey::new(DiffSide::Delete, n)));
        }
        self.collect(&keys)
    }

    /// Threads for one cell of a split row.
    pub fn for_cell(&self, side: DiffSide, line: u32) -> LineComments {
        self.collect(&[CoordinateKey::new(side, line)])
    }

    /// Every thread of the file ordered by `(side, end_line)`, for files without line rows.
    pub fn all(&self) -> LineComments {
        let mut keys: Vec<CoordinateKey> = self.index.keys().copied().collect();
        keys.sort();
        self.collect(&keys)
    }

    /// Threads placed on `hidden` lines of a gap, counting both sides.
    pub fn count_hidden(&self, gap: &Gap, hidden: LineRange) -> usize {
        let old = gap.old_line_for(hidden.start)..=gap.old_line_for(hidden.end);
        let keys: Vec<CoordinateKey> = self
            .index
            .keys()
            .filter(|key| match key.side {
                DiffSide::Add => hidden.lines().contains(&key.line),
                DiffSide::Delete => old.contains(&key.line),
            })
            .copied()
            .collect();
        self.index.at_any(&keys).len()
    }

    fn collect(&self, keys: &[CoordinateKey]) -> LineComments {
        let ids = self.index.at_any(keys);
        LineComments {
            gutter: self.store.gutter_indicator(&ids),
            ids,
        }
    }
}
