//! Explicit mapping from rendered rows back to line coordinates.

use crate::model::{CommentAnchor, DiffSide};
use std::collections::HashMap;

/// Column a rendered cell lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Unified,
    Left,
    Right,
}

/// Identity of a rendered line cell: row index within its file plus column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId {
    pub row: usize,
    pub column: Column,
}

impl RowId {
    pub fn unified(row: usize) -> Self {
        Self {
            row,
            column: Column::Unified,
        }
    }

    pub fn left(row: usize) -> Self {
        Self {
            row,
            column: Column::Left,
        }
    }

    pub fn right(row: usize) -> Self {
        Self {
            row,
            column: Column::Right,
        }
    }
}

/// A `(side, line)` position in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineCoordinate {
    pub side: DiffSide,
    pub line: u32,
}

/// Row-to-coordinate table of one rendered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMap {
    path: String,
    coordinates: HashMap<RowId, LineCoordinate>,
}

impl RowMap {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            coordinates: HashMap::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn insert(&mut self, id: RowId, side: DiffSide, line: u32) {
        self.coordinates.insert(id, LineCoordinate { side, line });
    }

    pub fn coordinate(&self, id: RowId) -> Option<LineCoordinate> {
        self.coordinates.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Anchor for a selection running from row `from` to row `to`.
    ///
    /// The side comes from `to`, where the thread will be placed. A start
    /// row on the other side collapses the anchor to the single end line.
    /// Rows without a coordinate (headers, gap affordances) yield `None`.
    pub fn anchor_for_rows(&self, from: RowId, to: RowId) -> Option<CommentAnchor> {
        let end = self.coordinate(to)?;
        let start = self.coordinate(from)?;
        let start_line = if start.side == end.side {
            start.line
        } else {
            end.line
        };
        Some(CommentAnchor::new(
            self.path.clone(),
            end.side,
            start_line,
            end.line,
        ))
    }
}
