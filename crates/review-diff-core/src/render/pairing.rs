//! Align deleted and inserted lines into two-column rows.

use crate::model::{DiffLine, LineKind};

/// One side of a split row, pointing back into the hunk's lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCell {
    /// Index into the hunk's `lines`.
    pub line_index: usize,
    /// Line number on this cell's side.
    pub line_number: u32,
    pub kind: LineKind,
}

/// A split-view row. Context lines populate both cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitPair {
    pub left: Option<LineCell>,
    pub right: Option<LineCell>,
}

impl SplitPair {
    pub fn is_context(&self) -> bool {
        matches!(
            (self.left, self.right),
            (Some(l), Some(r)) if l.kind == LineKind::Context && r.kind == LineKind::Context
        )
    }
}

fn flush(deletes: &mut Vec<LineCell>, inserts: &mut Vec<LineCell>, pairs: &mut Vec<SplitPair>) {
    let rows = deletes.len().max(inserts.len());
    for i in 0..rows {
        pairs.push(SplitPair {
            left: deletes.get(i).copied(),
            right: inserts.get(i).copied(),
        });
    }
    deletes.clear();
    inserts.clear();
}

/// Pair a hunk's lines for the split view.
///
/// Runs of deletions are matched 1:1 with the following run of insertions,
/// the shorter run padded with empty cells. No intra-hunk realignment.
pub fn pair_lines(lines: &[DiffLine]) -> Vec<SplitPair> {
    let mut pairs = Vec::with_capacity(lines.len());
    let mut deletes = Vec::new();
    let mut inserts = Vec::new();

    for (line_index, line) in lines.iter().enumerate() {
        match line.kind {
            LineKind::Delete => deletes.push(LineCell {
                line_index,
                line_number: line.old_line.unwrap_or_default(),
                kind: LineKind::Delete,
            }),
            LineKind::Insert => inserts.push(LineCell {
                line_index,
                line_number: line.new_line.unwrap_or_default(),
                kind: LineKind::Insert,
            }),
            LineKind::Context => {
                flush(&mut deletes, &mut inserts, &mut pairs);
                pairs.push(SplitPair {
                    left: Some(LineCell {
                        line_index,
                        line_number: line.old_line.unwrap_or_default(),
                        kind: LineKind::Context,
                    }),
                    right: Some(LineCell {
                        line_index,
                        line_number: line.new_line.unwrap_or_default(),
                        kind: LineKind::Context,
                    }),
                });
            }
        }
    }
    flush(&mut deletes, &mut inserts, &mut pairs);

    pairs
}
