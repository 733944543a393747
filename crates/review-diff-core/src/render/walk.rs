//! Linear walk over a file view: leading gap, hunks, inter-hunk gaps, trailing gap.
//!
//! Both row builders consume the blocks produced here, so highlighting and
//! gap materialization happen in one place.

use super::annotations::Annotator;
use crate::highlight::{plain_lines, DiffHighlighter};
use crate::model::{gap_at, DiffLine, Gap};
use crate::state::{ExpandedRanges, FileView, LineRange};

/// A "N lines hidden" affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapRow {
    pub gap_index: usize,
    /// Hidden lines; `None` while the file length is unknown.
    pub hidden: Option<u32>,
    /// Full file content is being fetched.
    pub loading: bool,
    /// Comment threads placed on the hidden lines.
    pub comments: usize,
}

/// A run of lines sharing one highlight pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LineBlock {
    pub lines: Vec<DiffLine>,
    /// One fragment per entry of `lines`.
    pub html: Vec<String>,
    /// Revealed from a gap rather than part of a hunk.
    pub expanded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Block {
    HunkHeader { hunk_index: usize, header: String },
    Lines(LineBlock),
    Gap(GapRow),
}

pub(crate) fn walk(
    view: &FileView,
    highlighter: &mut DiffHighlighter,
    annotator: &Annotator<'_>,
) -> Vec<Block> {
    let hunks = &view.file().hunks;
    let gaps = view.gaps();
    let mut blocks = Vec::new();

    for (hunk_index, hunk) in hunks.iter().enumerate() {
        if let Some(gap) = gap_at(&gaps, hunk_index) {
            push_gap(view, gap, highlighter, annotator, &mut blocks);
        }

        blocks.push(Block::HunkHeader {
            hunk_index,
            header: hunk.header.clone(),
        });
        let contents: Vec<&str> = hunk.lines.iter().map(|l| l.content.as_str()).collect();
        blocks.push(Block::Lines(LineBlock {
            html: highlighter.highlight_block(view.path(), &contents),
            lines: hunk.lines.clone(),
            expanded: false,
        }));
    }

    let trailing = hunks.len();
    match gap_at(&gaps, trailing) {
        Some(gap) => push_gap(view, gap, highlighter, annotator, &mut blocks),
        None if view.total_lines().is_none() && !hunks.is_empty() => {
            blocks.push(Block::Gap(GapRow {
                gap_index: trailing,
                hidden: None,
                loading: view.is_loading(),
                comments: 0,
            }));
        }
        None => {}
    }

    blocks
}

fn push_gap(
    view: &FileView,
    gap: &Gap,
    highlighter: &mut DiffHighlighter,
    annotator: &Annotator<'_>,
    blocks: &mut Vec<Block>,
) {
    if view.file_lines().is_none() {
        let whole = LineRange {
            start: gap.start_line,
            end: gap.end_line,
        };
        blocks.push(Block::Gap(GapRow {
            gap_index: gap.gap_index,
            hidden: Some(gap.total_lines),
            loading: view.is_loading(),
            comments: annotator.count_hidden(gap, whole),
        }));
        return;
    }

    let ranges = view.ranges(gap);
    let expansion = view.tracker().get(gap.gap_index);

    if let Some(top) = ranges.top {
        blocks.extend(revealed_block(view, gap, top, highlighter));
    }
    if !expansion.is_fully_expanded(gap) {
        blocks.push(Block::Gap(GapRow {
            gap_index: gap.gap_index,
            hidden: Some(expansion.remaining(gap)),
            loading: view.is_loading(),
            comments: hidden_range(gap, &ranges)
                .map_or(0, |hidden| annotator.count_hidden(gap, hidden)),
        }));
    }
    if let Some(bottom) = ranges.bottom {
        blocks.extend(revealed_block(view, gap, bottom, highlighter));
    }
}

/// Lines of `gap` between its revealed top and bottom ranges.
fn hidden_range(gap: &Gap, ranges: &ExpandedRanges) -> Option<LineRange> {
    let start = ranges.top.map_or(gap.start_line, |r| r.end + 1);
    let end = ranges.bottom.map_or(gap.end_line, |r| r.start - 1);
    (start <= end).then_some(LineRange { start, end })
}

/// Context lines for a revealed range, once the file text is available.
fn revealed_block(
    view: &FileView,
    gap: &Gap,
    range: LineRange,
    highlighter: &mut DiffHighlighter,
) -> Option<Block> {
    let file_lines = view.file_lines()?;
    let lines: Vec<DiffLine> = range
        .lines()
        .filter_map(|new_line| {
            let text = file_lines.line(new_line)?;
            Some(DiffLine::context(text, gap.old_line_for(new_line), new_line))
        })
        .collect();
    if lines.is_empty() {
        return None;
    }

    let contents: Vec<&str> = lines.iter().map(|l| l.content.as_str()).collect();
    let html = if file_lines.placeholder {
        plain_lines(&contents)
    } else {
        highlighter.highlight_block(view.path(), &contents)
    };

    Some(Block::Lines(LineBlock {
        lines,
        html,
        expanded: true,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ViewAction;
    use crate::fetch::LoadToken;
    use crate::model::{
        CommentAnchor, CommentsResponse, DiffFile, DiffHunk, DiffSide, ReviewComment,
        ReviewCommentEntry,
    };
    use crate::state::CommentStore;

    fn view_with_gap() -> FileView {
        let mut file = DiffFile::new("notes.txt");
        let mut first = DiffHunk::new(1, 1, 1, 1);
        first.lines.push(DiffLine::context("one", 1, 1));
        let mut second = DiffHunk::new(50, 1, 50, 1);
        second.lines.push(DiffLine::insert("fifty", 50));
        file.hunks = vec![first, second];
        FileView::new(file, LoadToken(1), 20)
    }

    fn text(lines: u32) -> String {
        (1..=lines).map(|n| format!("row {}\n", n)).collect()
    }

    fn blocks(view: &FileView, store: &CommentStore) -> Vec<Block> {
        let mut highlighter = DiffHighlighter::new().with_enabled(false);
        walk(view, &mut highlighter, &Annotator::new(view, store))
    }

    fn gap_rows(blocks: &[Block]) -> Vec<GapRow> {
        blocks
            .iter()
            .filter_map(|b| match b {
                Block::Gap(row) => Some(*row),
                _ => None,
            })
            .collect()
    }

    fn store_on_new_side(lines: &[u32]) -> CommentStore {
        let comments: Vec<ReviewCommentEntry> = lines
            .iter()
            .map(|&line| {
                ReviewComment::inline(
                    format!("c{}", line),
                    CommentAnchor::single("notes.txt", DiffSide::Add, line),
                    "look here",
                )
                .into()
            })
            .collect();
        let mut store = CommentStore::default();
        store
            .load(Ok(CommentsResponse {
                comments,
                ..Default::default()
            }))
            .unwrap();
        store
    }

    #[test]
    fn test_unknown_length_shows_trailing_affordance() {
        let view = view_with_gap();
        let gaps = gap_rows(&blocks(&view, &CommentStore::default()));
        assert_eq!(
            gaps,
            vec![
                GapRow {
                    gap_index: 1,
                    hidden: Some(48),
                    loading: false,
                    comments: 0
                },
                GapRow {
                    gap_index: 2,
                    hidden: None,
                    loading: false,
                    comments: 0
                },
            ]
        );
    }

    #[test]
    fn test_partial_expansion_splits_around_affordance() {
        let mut view = view_with_gap();
        view.handle_action(ViewAction::ExpandDown(1));
        view.handle_action(ViewAction::ExpandUp(1));
        view.apply_file_content(LoadToken(1), Ok(text(50)));

        let blocks = blocks(&view, &CommentStore::default());
        // header, hunk, top context, affordance, bottom context, header, hunk
        assert_eq!(blocks.len(), 7);
        let Block::Lines(top) = &blocks[2] else {
            panic!("expected revealed lines, got {:?}", blocks[2]);
        };
        assert!(top.expanded);
        assert_eq!(top.lines.len(), 20);
        assert_eq!(top.lines[0].new_line, Some(2));
        assert_eq!(top.html[0], "row 2");
        assert_eq!(
            blocks[3],
            Block::Gap(GapRow {
                gap_index: 1,
                hidden: Some(8),
                loading: false,
                comments: 0
            })
        );
        let Block::Lines(bottom) = &blocks[4] else {
            panic!("expected revealed lines, got {:?}", blocks[4]);
        };
        assert_eq!(bottom.lines.first().and_then(|l| l.new_line), Some(30));
        assert_eq!(bottom.lines.last().and_then(|l| l.new_line), Some(49));
    }

    #[test]
    fn test_provisional_expansion_waits_for_content() {
        let mut view = view_with_gap();
        view.handle_action(ViewAction::ExpandAll(1));
        assert!(view.is_loading());

        let blocks = blocks(&view, &CommentStore::default());
        assert!(blocks
            .iter()
            .all(|b| !matches!(b, Block::Lines(l) if l.expanded)));
        assert!(blocks.contains(&Block::Gap(GapRow {
            gap_index: 1,
            hidden: Some(48),
            loading: true,
            comments: 0
        })));
    }

    #[test]
    fn test_gap_counts_threads_on_hidden_lines() {
        let store = store_on_new_side(&[20, 25, 50]);
        let mut view = view_with_gap();
        assert_eq!(gap_rows(&blocks(&view, &store))[0].comments, 2);

        view.handle_action(ViewAction::ExpandDown(1));
        view.handle_action(ViewAction::ExpandUp(1));
        view.apply_file_content(LoadToken(1), Ok(text(50)));

        // Lines 22-29 stay hidden; line 20 is revealed.
        let gaps = gap_rows(&blocks(&view, &store));
        assert_eq!(gaps[0].hidden, Some(8));
        assert_eq!(gaps[0].comments, 1);
    }
}
