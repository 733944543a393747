//! Unified (single column) rows.

use super::annotations::{Annotator, LineComments};
use super::row_map::{RowId, RowMap};
use super::search::number_matches;
use super::walk::{walk, Block, GapRow};
use super::RenderContext;
use crate::model::{DiffLine, LineKind};
use crate::state::FileView;

/// A changed, context or revealed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRow {
    pub id: RowId,
    pub kind: LineKind,
    pub old_line: Option<u32>,
    pub new_line: Option<u32>,
    /// Highlighted, balanced markup for this line only.
    pub html: String,
    /// Revealed from a gap.
    pub expanded: bool,
    pub comments: LineComments,
    pub match_indices: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnifiedRow {
    HunkHeader { hunk_index: usize, header: String },
    Line(LineRow),
    Gap(GapRow),
    /// The file has no hunks (including virtual files).
    NoChanges,
    Binary,
    /// Inline threads of a file without line rows, ordered by placement.
    OrphanThreads(LineComments),
}

/// Unified rendering of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnifiedFile {
    pub path: String,
    pub rows: Vec<UnifiedRow>,
    pub row_map: RowMap,
}

impl UnifiedFile {
    /// Line rows only.
    pub fn lines(&self) -> impl Iterator<Item = &LineRow> {
        self.rows.iter().filter_map(|row| match row {
            UnifiedRow::Line(line) => Some(line),
            _ => None,
        })
    }
}

pub fn render_unified(view: &FileView, ctx: &mut RenderContext<'_>) -> UnifiedFile {
    let path = view.path().to_string();
    let mut rows = Vec::new();
    let mut row_map = RowMap::new(path.clone());

    let annotator = Annotator::new(view, ctx.comments);
    if view.file().is_binary || !view.file().has_content_changes() {
        rows.push(if view.file().is_binary {
            UnifiedRow::Binary
        } else {
            UnifiedRow::NoChanges
        });
        let threads = annotator.all();
        if !threads.ids.is_empty() {
            rows.push(UnifiedRow::OrphanThreads(threads));
        }
    } else {
        for block in walk(view, ctx.highlighter, &annotator) {
            match block {
                Block::HunkHeader { hunk_index, header } => {
                    rows.push(UnifiedRow::HunkHeader { hunk_index, header })
                }
                Block::Gap(gap) => rows.push(UnifiedRow::Gap(gap)),
                Block::Lines(block) => {
                    for (line, html) in block.lines.into_iter().zip(block.html) {
                        let id = RowId::unified(rows.len());
                        let side = line.primary_side();
                        if let Some(number) = line.line_on(side) {
                            row_map.insert(id, side, number);
                        }
                        rows.push(UnifiedRow::Line(line_row(
                            id,
                            line,
                            html,
                            block.expanded,
                            &annotator,
                            ctx,
                        )));
                    }
                }
            }
        }
    }

    UnifiedFile {
        path,
        rows,
        row_map,
    }
}

fn line_row(
    id: RowId,
    line: DiffLine,
    html: String,
    expanded: bool,
    annotator: &Annotator<'_>,
    ctx: &mut RenderContext<'_>,
) -> LineRow {
    LineRow {
        id,
        kind: line.kind,
        old_line: line.old_line,
        new_line: line.new_line,
        html,
        expanded,
        comments: annotator.for_line(&line),
        match_indices: number_matches(&line.content, ctx.query, ctx.matches),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::LoadToken;
    use crate::highlight::DiffHighlighter;
    use crate::model::{
        CommentAnchor, CommentsResponse, DiffFile, DiffHunk, DiffSide, ReviewComment,
    };
    use crate::render::MatchSequence;
    use crate::state::CommentStore;
    use crate::ViewAction;
    use pretty_assertions::assert_eq;

    fn file() -> DiffFile {
        let mut file = DiffFile::new("src/main.rs");
        let mut hunk = DiffHunk::new(3, 3, 3, 3);
        hunk.lines.push(DiffLine::context("let a = 1;", 3, 3));
        hunk.lines.push(DiffLine::delete("let b = 2;", 4));
        hunk.lines.push(DiffLine::insert("let b = 3;", 4));
        hunk.lines.push(DiffLine::context("let c = a + b;", 5, 5));
        file.hunks.push(hunk);
        file
    }

    fn store(comments: Vec<ReviewComment>) -> CommentStore {
        let mut store = CommentStore::default();
        store
            .load(Ok(CommentsResponse {
                comments: comments.into_iter().map(Into::into).collect(),
                ..Default::default()
            }))
            .unwrap();
        store
    }

    fn render(view: &FileView, store: &CommentStore, query: Option<&str>) -> UnifiedFile {
        let mut highlighter = DiffHighlighter::new().with_enabled(false);
        let mut matches = MatchSequence::new();
        let mut ctx = RenderContext {
            highlighter: &mut highlighter,
            comments: store,
            matches: &mut matches,
            query,
        };
        render_unified(view, &mut ctx)
    }

    #[test]
    fn test_rows_follow_the_walk() {
        let view = FileView::new(file(), LoadToken(1), 20);
        let rendered = render(&view, &CommentStore::default(), None);

        assert_eq!(
            rendered.rows[0],
            UnifiedRow::Gap(GapRow {
                gap_index: 0,
                hidden: Some(2),
                loading: false,
                comments: 0
            })
        );
        assert!(matches!(rendered.rows[1], UnifiedRow::HunkHeader { hunk_index: 0, .. }));
        let kinds: Vec<_> = rendered.lines().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LineKind::Context,
                LineKind::Delete,
                LineKind::Insert,
                LineKind::Context
            ]
        );
        assert_eq!(rendered.lines().nth(1).unwrap().html, "let b = 2;");
        assert!(matches!(rendered.rows.last(), Some(UnifiedRow::Gap(g)) if g.hidden.is_none()));
    }

    #[test]
    fn test_row_map_and_anchor() {
        let view = FileView::new(file(), LoadToken(1), 20);
        let rendered = render(&view, &CommentStore::default(), None);
        let ids: Vec<_> = rendered.lines().map(|l| l.id).collect();

        let anchor = rendered.row_map.anchor_for_rows(ids[3], ids[2]).unwrap();
        assert_eq!(anchor, CommentAnchor::new("src/main.rs", DiffSide::Add, 4, 5));

        let deleted = rendered.row_map.coordinate(ids[1]).unwrap();
        assert_eq!((deleted.side, deleted.line), (DiffSide::Delete, 4));
    }

    #[test]
    fn test_comments_attach_to_both_sides_of_context() {
        let comments = vec![
            ReviewComment::inline(
                "old",
                CommentAnchor::single("src/main.rs", DiffSide::Delete, 5),
                "on the old side",
            ),
            ReviewComment::inline(
                "gone",
                CommentAnchor::single("src/main.rs", DiffSide::Add, 99),
                "past the end",
            ),
        ];
        let store = store(comments);
        let view = FileView::new(file(), LoadToken(1), 20);
        let rendered = render(&view, &store, None);

        let last = rendered.lines().last().unwrap();
        assert_eq!(last.comments.ids, vec!["gone".to_string(), "old".to_string()]);
        assert_eq!(last.comments.gutter.as_ref().map(|g| g.count), Some(2));
    }

    #[test]
    fn test_expanded_context_rows() {
        let mut view = FileView::new(file(), LoadToken(1), 20);
        view.handle_action(ViewAction::ExpandAll(0));
        view.apply_file_content(LoadToken(1), Ok("fn main() {\n// setup\n".to_string()));

        let rendered = render(&view, &CommentStore::default(), None);
        let first = rendered.lines().next().unwrap();
        assert!(first.expanded);
        assert_eq!((first.old_line, first.new_line), (Some(1), Some(1)));
        assert_eq!(first.html, "fn main() {");
    }

    #[test]
    fn test_search_numbers_matches_in_order() {
        let view = FileView::new(file(), LoadToken(1), 20);
        let rendered = render(&view, &CommentStore::default(), Some("let b"));
        let matches: Vec<_> = rendered
            .lines()
            .map(|l| l.match_indices.clone())
            .collect();
        assert_eq!(matches, vec![vec![], vec![0], vec![1], vec![]]);
    }

    #[test]
    fn test_file_without_hunks() {
        let view = FileView::new(DiffFile::virtual_file("docs/plan.md"), LoadToken(1), 20);
        let rendered = render(&view, &CommentStore::default(), None);
        assert_eq!(rendered.rows, vec![UnifiedRow::NoChanges]);

        let mut binary = DiffFile::new("logo.png");
        binary.is_binary = true;
        let view = FileView::new(binary, LoadToken(1), 20);
        assert_eq!(
            render(&view, &CommentStore::default(), None).rows,
            vec![UnifiedRow::Binary]
        );
    }

    #[test]
    fn test_threads_without_line_rows_keep_placement_order() {
        let comments = vec![
            ReviewComment::inline(
                "late",
                CommentAnchor::single("docs/plan.md", DiffSide::Add, 9),
                "second",
            ),
            ReviewComment::inline(
                "old",
                CommentAnchor::single("docs/plan.md", DiffSide::Delete, 2),
                "last",
            ),
            ReviewComment::inline(
                "early",
                CommentAnchor::new("docs/plan.md", DiffSide::Add, 1, 3),
                "first",
            ),
        ];
        let store = store(comments);
        let view = FileView::new(DiffFile::virtual_file("docs/plan.md"), LoadToken(1), 20);
        let rendered = render(&view, &store, None);

        assert_eq!(rendered.rows.len(), 2);
        assert_eq!(rendered.rows[0], UnifiedRow::NoChanges);
        let UnifiedRow::OrphanThreads(threads) = &rendered.rows[1] else {
            panic!("expected threads, got {:?}", rendered.rows[1]);
        };
        assert_eq!(threads.ids, vec!["early", "late", "old"]);
        assert_eq!(threads.gutter.as_ref().map(|g| g.count), Some(3));
    }
}
