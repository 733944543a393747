//! Split (two column) rows.

use super::annotations::{Annotator, LineComments};
use super::pairing::{pair_lines, LineCell};
use super::row_map::{RowId, RowMap};
use super::search::number_matches;
use super::walk::{walk, Block, GapRow, LineBlock};
use super::RenderContext;
use crate::model::{DiffSide, LineKind};
use crate::state::FileView;

/// One column of a split row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitCell {
    pub id: RowId,
    pub kind: LineKind,
    pub line_number: u32,
    pub html: String,
    pub expanded: bool,
    pub comments: LineComments,
    pub match_indices: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitRow {
    HunkHeader {
        hunk_index: usize,
        header: String,
    },
    /// Old file on the left, new file on the right; `None` is a blank cell.
    Pair {
        left: Option<SplitCell>,
        right: Option<SplitCell>,
    },
    Gap(GapRow),
    NoChanges,
    Binary,
    /// Inline threads of a file without line rows, ordered by placement.
    OrphanThreads(LineComments),
}

/// Split rendering of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitFile {
    pub path: String,
    pub rows: Vec<SplitRow>,
    pub row_map: RowMap,
}

pub fn render_split(view: &FileView, ctx: &mut RenderContext<'_>) -> SplitFile {
    let path = view.path().to_string();
    let mut builder = SplitBuilder {
        rows: Vec::new(),
        row_map: RowMap::new(path.clone()),
    };

    let annotator = Annotator::new(view, ctx.comments);
    if view.file().is_binary || !view.file().has_content_changes() {
        builder.rows.push(if view.file().is_binary {
            SplitRow::Binary
        } else {
            SplitRow::NoChanges
        });
        let threads = annotator.all();
        if !threads.ids.is_empty() {
            builder.rows.push(SplitRow::OrphanThreads(threads));
        }
    } else {
        for block in walk(view, ctx.highlighter, &annotator) {
            match block {
                Block::HunkHeader { hunk_index, header } => builder
                    .rows
                    .push(SplitRow::HunkHeader { hunk_index, header }),
                Block::Gap(gap) => builder.rows.push(SplitRow::Gap(gap)),
                Block::Lines(block) => builder.push_lines(&block, &annotator, ctx),
            }
        }
    }

    SplitFile {
        path,
        rows: builder.rows,
        row_map: builder.row_map,
    }
}

struct SplitBuilder {
    rows: Vec<SplitRow>,
    row_map: RowMap,
}

impl SplitBuilder {
    fn push_lines(
        &mut self,
        block: &LineBlock,
        annotator: &Annotator<'_>,
        ctx: &mut RenderContext<'_>,
    ) {
        for pair in pair_lines(&block.lines) {
            let row = self.rows.len();
            let left = pair.left.map(|cell| {
                self.cell(RowId::left(row), DiffSide::Delete, cell, block, annotator, ctx)
            });
            let right = pair.right.map(|cell| {
                self.cell(RowId::right(row), DiffSide::Add, cell, block, annotator, ctx)
            });
            self.rows.push(SplitRow::Pair { left, right });
        }
    }

    fn cell(
        &mut self,
        id: RowId,
        side: DiffSide,
        cell: LineCell,
        block: &LineBlock,
        annotator: &Annotator<'_>,
        ctx: &mut RenderContext<'_>,
    ) -> SplitCell {
        self.row_map.insert(id, side, cell.line_number);
        let content = block
            .lines
            .get(cell.line_index)
            .map_or("", |l| l.content.as_str());
        SplitCell {
            id,
            kind: cell.kind,
            line_number: cell.line_number,
            html: block.html.get(cell.line_index).cloned().unwrap_or_default(),
            expanded: block.expanded,
            comments: annotator.for_cell(side, cell.line_number),
            match_indices: number_matches(content, ctx.query, ctx.matches),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::LoadToken;
    use crate::highlight::DiffHighlighter;
    use crate::model::{
        CommentAnchor, CommentsResponse, DiffFile, DiffHunk, DiffLine, ReviewComment,
    };
    use crate::render::MatchSequence;
    use crate::state::CommentStore;
    use crate::ViewAction;
    use pretty_assertions::assert_eq;

    fn file() -> DiffFile {
        let mut file = DiffFile::new("lib.py");
        let mut hunk = DiffHunk::new(1, 3, 1, 2);
        hunk.lines.push(DiffLine::delete("a = 1", 1));
        hunk.lines.push(DiffLine::delete("b = 2", 2));
        hunk.lines.push(DiffLine::insert("ab = 3", 1));
        hunk.lines.push(DiffLine::context("print(ab)", 3, 2));
        file.hunks.push(hunk);
        file
    }

    fn render(view: &FileView, store: &CommentStore, query: Option<&str>) -> SplitFile {
        let mut highlighter = DiffHighlighter::new().with_enabled(false);
        let mut matches = MatchSequence::new();
        let mut ctx = RenderContext {
            highlighter: &mut highlighter,
            comments: store,
            matches: &mut matches,
            query,
        };
        render_split(view, &mut ctx)
    }

    fn pairs(rendered: &SplitFile) -> Vec<(Option<u32>, Option<u32>)> {
        rendered
            .rows
            .iter()
            .filter_map(|row| match row {
                SplitRow::Pair { left, right } => Some((
                    left.as_ref().map(|c| c.line_number),
                    right.as_ref().map(|c| c.line_number),
                )),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_ragged_pairs() {
        let view = FileView::new(file(), LoadToken(1), 20);
        let rendered = render(&view, &CommentStore::default(), None);

        assert_eq!(
            pairs(&rendered),
            vec![(Some(1), Some(1)), (Some(2), None), (Some(3), Some(2))]
        );
        let SplitRow::Pair { left, right } = &rendered.rows[2] else {
            panic!("expected a pair, got {:?}", rendered.rows[2]);
        };
        assert_eq!(left.as_ref().unwrap().html, "b = 2");
        assert!(right.is_none());
    }

    #[test]
    fn test_cells_map_to_their_side() {
        let view = FileView::new(file(), LoadToken(1), 20);
        let rendered = render(&view, &CommentStore::default(), None);

        // Row 0 is the hunk header.
        let left = rendered.row_map.coordinate(RowId::left(1)).unwrap();
        let right = rendered.row_map.coordinate(RowId::right(1)).unwrap();
        assert_eq!((left.side, left.line), (DiffSide::Delete, 1));
        assert_eq!((right.side, right.line), (DiffSide::Add, 1));
        assert_eq!(rendered.row_map.coordinate(RowId::right(2)), None);

        let anchor = rendered
            .row_map
            .anchor_for_rows(RowId::left(3), RowId::left(1))
            .unwrap();
        assert_eq!(anchor, CommentAnchor::new("lib.py", DiffSide::Delete, 1, 3));
    }

    #[test]
    fn test_comments_land_in_their_column() {
        let mut store = CommentStore::default();
        let comment = ReviewComment::inline(
            "1",
            CommentAnchor::single("lib.py", DiffSide::Delete, 3),
            "keep this?",
        );
        store
            .load(Ok(CommentsResponse {
                comments: vec![comment.into()],
                ..Default::default()
            }))
            .unwrap();

        let view = FileView::new(file(), LoadToken(1), 20);
        let rendered = render(&view, &store, None);
        let SplitRow::Pair { left, right } = &rendered.rows[3] else {
            panic!("expected a pair, got {:?}", rendered.rows[3]);
        };
        assert_eq!(left.as_ref().unwrap().comments.ids, vec!["1".to_string()]);
        assert!(right.as_ref().unwrap().comments.ids.is_empty());
    }

    #[test]
    fn test_revealed_context_is_full_width() {
        let mut f = file();
        f.hunks[0] = DiffHunk::new(1, 0, 1, 1);
        f.hunks[0].lines.push(DiffLine::insert("x = 0", 1));
        let mut view = FileView::new(f, LoadToken(1), 20);
        view.handle_action(ViewAction::Prefetch);
        view.apply_file_content(LoadToken(1), Ok("x = 0\ny = 1\nz = 2\n".to_string()));
        view.handle_action(ViewAction::ExpandAll(1));

        let rendered = render(&view, &CommentStore::default(), Some("="));
        assert_eq!(
            pairs(&rendered),
            vec![(None, Some(1)), (Some(1), Some(2)), (Some(2), Some(3))]
        );
        let SplitRow::Pair { left, right } = &rendered.rows[2] else {
            panic!("expected a pair, got {:?}", rendered.rows[2]);
        };
        let (left, right) = (left.as_ref().unwrap(), right.as_ref().unwrap());
        assert!(left.expanded && right.expanded);
        assert_eq!(left.html, right.html);
        assert_eq!(left.match_indices, vec![1]);
        assert_eq!(right.match_indices, vec![2]);
    }

    #[test]
    fn test_threads_of_binary_file_are_kept() {
        let mut binary = DiffFile::new("logo.png");
        binary.is_binary = true;
        let mut store = CommentStore::default();
        store
            .load(Ok(CommentsResponse {
                comments: vec![ReviewComment::inline(
                    "png",
                    CommentAnchor::single("logo.png", DiffSide::Add, 1),
                    "too large",
                )
                .into()],
                ..Default::default()
            }))
            .unwrap();

        let view = FileView::new(binary, LoadToken(1), 20);
        let rendered = render(&view, &store, None);
        assert_eq!(rendered.rows.len(), 2);
        assert_eq!(rendered.rows[0], SplitRow::Binary);
        let SplitRow::OrphanThreads(threads) = &rendered.rows[1] else {
            panic!("expected threads, got {:?}", rendered.rows[1]);
        };
        assert_eq!(threads.ids, vec!["png".to_string()]);
    }
}
