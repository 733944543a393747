//! Unchanged regions omitted from the hunk payload.

use super::diff::DiffHunk;

/// A run of new-side lines not covered by any hunk.
///
/// Gap `i` sits immediately before hunk `i`; gap `hunks.len()` is the
/// trailing gap, which only exists once the file length is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gap {
    pub gap_index: usize,
    /// First new-side line (1-indexed, inclusive).
    pub start_line: u32,
    /// Last new-side line (inclusive).
    pub end_line: u32,
    /// Old-side line matching `start_line`.
    pub old_start_line: u32,
    pub total_lines: u32,
}

impl Gap {
    fn new(gap_index: usize, start_line: u32, end_line: u32, old_start_line: u32) -> Self {
        Self {
            gap_index,
            start_line,
            end_line,
            old_start_line,
            total_lines: end_line - start_line + 1,
        }
    }

    /// Old-side line number for a new-side line inside this gap.
    ///
    /// Unchanged regions map old and new lines one to one.
    pub fn old_line_for(&self, new_line: u32) -> u32 {
        self.old_start_line + (new_line - self.start_line)
    }

    pub fn contains(&self, new_line: u32) -> bool {
        (self.start_line..=self.end_line).contains(&new_line)
    }

    /// Whether this is the gap after the last hunk.
    pub fn is_trailing(&self, hunk_count: usize) -> bool {
        self.gap_index == hunk_count
    }
}

/// Compute the gaps around `hunks` (sorted by ascending `new_start`).
///
/// The trailing gap is only produced when `total_lines` is known.
/// A file without hunks has no gaps.
pub fn compute_gaps(hunks: &[DiffHunk], total_lines: Option<u32>) -> Vec<Gap> {
    let Some(first) = hunks.first() else {
        return Vec::new();
    };

    let mut gaps = Vec::new();

    if first.new_start > 1 {
        gaps.push(Gap::new(0, 1, first.new_start - 1, 1));
    }

    for (index, pair) in hunks.windows(2).enumerate() {
        let (prev, cur) = (&pair[0], &pair[1]);
        let gap_start = prev.new_after().max(1);
        let gap_end = cur.new_start.saturating_sub(1);
        if gap_end >= gap_start {
            gaps.push(Gap::new(index + 1, gap_start, gap_end, prev.old_after()));
        }
    }

    if let (Some(total), Some(last)) = (total_lines, hunks.last()) {
        let gap_start = last.new_after().max(1);
        if gap_start <= total {
            gaps.push(Gap::new(hunks.len(), gap_start, total, last.old_after()));
        }
    }

    gaps
}

/// Gap at a given hunk-relative index, if it exists.
pub fn gap_at(gaps: &[Gap], gap_index: usize) -> Option<&Gap> {
    gaps.iter().find(|g| g.gap_index == gap_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hunk(new_start: u32, new_lines: u32) -> DiffHunk {
        DiffHunk::new(new_start, new_lines, new_start, new_lines)
    }

    #[test]
    fn test_three_hunk_file() {
        let hunks = vec![hunk(10, 6), hunk(30, 6), hunk(50, 6)];
        let gaps = compute_gaps(&hunks, Some(60));

        let ranges: Vec<_> = gaps
            .iter()
            .map(|g| (g.gap_index, g.start_line, g.end_line))
            .collect();
        assert_eq!(ranges, vec![(0, 1, 9), (1, 16, 29), (2, 36, 49), (3, 56, 60)]);
        assert_eq!(gaps[1].total_lines, 14);
    }

    #[test]
    fn test_trailing_gap_needs_total() {
        let hunks = vec![hunk(1, 5)];
        assert!(compute_gaps(&hunks, None).is_empty());
        assert!(compute_gaps(&hunks, Some(5)).is_empty());

        let gaps = compute_gaps(&hunks, Some(8));
        assert_eq!(gaps.len(), 1);
        assert!(gaps[0].is_trailing(1));
        assert_eq!((gaps[0].start_line, gaps[0].end_line), (6, 8));
    }

    #[test]
    fn test_adjacent_hunks_have_no_gap() {
        let hunks = vec![hunk(1, 5), hunk(6, 3)];
        assert!(compute_gaps(&hunks, Some(8)).is_empty());
    }

    #[test]
    fn test_no_hunks_no_gaps() {
        assert!(compute_gaps(&[], Some(100)).is_empty());
    }

    #[test]
    fn test_old_start_tracks_previous_hunk() {
        let hunks = vec![DiffHunk::new(1, 4, 1, 2), DiffHunk::new(10, 2, 8, 2)];
        let gaps = compute_gaps(&hunks, None);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].start_line, 3);
        assert_eq!(gaps[0].old_start_line, 5);
        assert_eq!(gaps[0].old_line_for(7), 9);
    }
}
