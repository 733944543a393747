//! Per-gap expansion state and range materialization.

use crate::model::Gap;
use std::collections::HashMap;

/// Default number of lines revealed by one expand step.
pub const DEFAULT_EXPAND_STEP: u32 = 20;

/// Mutable expansion state of one gap.
///
/// `from_top + from_bottom <= gap.total_lines` once the gap bounds are known.
/// `full` supersedes both counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GapExpansion {
    pub from_top: u32,
    pub from_bottom: u32,
    pub full: bool,
}

impl GapExpansion {
    /// Lines still hidden in `gap`.
    pub fn remaining(&self, gap: &Gap) -> u32 {
        if self.full {
            0
        } else {
            gap.total_lines
                .saturating_sub(self.from_top.saturating_add(self.from_bottom))
        }
    }

    /// Whether the "N lines remaining" affordance should disappear.
    pub fn is_fully_expanded(&self, gap: &Gap) -> bool {
        self.full || self.from_top.saturating_add(self.from_bottom) >= gap.total_lines
    }

    /// Bring provisional counters inside the gap once its bounds are known.
    fn clamp_to(&mut self, gap: &Gap) {
        self.from_top = self.from_top.min(gap.total_lines);
        self.from_bottom = self.from_bottom.min(gap.total_lines - self.from_top);
    }
}

/// Inclusive range of new-side line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    /// Number of lines; a range always holds at least one.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn lines(&self) -> std::ops::RangeInclusive<u32> {
        self.start..=self.end
    }
}

/// Revealed parts of a gap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpandedRanges {
    pub top: Option<LineRange>,
    pub bottom: Option<LineRange>,
}

impl ExpandedRanges {
    /// Number of revealed lines.
    pub fn revealed(&self) -> u32 {
        self.top.map_or(0, |r| r.len()) + self.bottom.map_or(0, |r| r.len())
    }
}

/// Materialize the revealed ranges of `gap` for an expansion state.
///
/// A fully expanded gap is returned entirely as `top`. Otherwise `top`
/// covers the first `from_top` lines, `bottom` the last `from_bottom`
/// lines, both clamped to the gap and never overlapping.
pub fn get_expanded_ranges(gap: &Gap, expansion: &GapExpansion) -> ExpandedRanges {
    if expansion.full {
        return ExpandedRanges {
            top: Some(LineRange {
                start: gap.start_line,
                end: gap.end_line,
            }),
            bottom: None,
        };
    }

    let top = (expansion.from_top > 0).then(|| LineRange {
        start: gap.start_line,
        end: gap
            .start_line
            .saturating_add(expansion.from_top - 1)
            .min(gap.end_line),
    });

    let bottom = if expansion.from_bottom > 0 {
        let mut start = (gap.end_line + 1)
            .saturating_sub(expansion.from_bottom)
            .max(gap.start_line);
        if let Some(top) = top {
            start = start.max(top.end + 1);
        }
        (start <= gap.end_line).then_some(LineRange {
            start,
            end: gap.end_line,
        })
    } else {
        None
    };

    ExpandedRanges { top, bottom }
}

/// Expansion state of every gap in one file view.
#[derive(Debug, Clone)]
pub struct ExpansionTracker {
    step: u32,
    gaps: HashMap<usize, GapExpansion>,
}

impl Default for ExpansionTracker {
    fn default() -> Self {
        Self::new(DEFAULT_EXPAND_STEP)
    }
}

impl ExpansionTracker {
    pub fn new(step: u32) -> Self {
        Self {
            step: step.max(1),
            gaps: HashMap::new(),
        }
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    /// Expansion state for a gap (collapsed if never touched).
    pub fn get(&self, gap_index: usize) -> GapExpansion {
        self.gaps.get(&gap_index).copied().unwrap_or_default()
    }

    /// Reveal more lines below the gap's top edge.
    ///
    /// With unknown bounds (`gap == None`) the request is queued as a
    /// provisional count, clamped later by [`ExpansionTracker::settle`].
    pub fn expand_down(&mut self, gap_index: usize, gap: Option<&Gap>) {
        let step = self.step;
        let entry = self.gaps.entry(gap_index).or_default();
        if entry.full {
            return;
        }
        match gap {
            Some(gap) => {
                entry.clamp_to(gap);
                entry.from_top += step.min(entry.remaining(gap));
            }
            None => entry.from_top = entry.from_top.saturating_add(step),
        }
    }

    /// Reveal more lines above the gap's bottom edge.
    pub fn expand_up(&mut self, gap_index: usize, gap: Option<&Gap>) {
        let step = self.step;
        let entry = self.gaps.entry(gap_index).or_default();
        if entry.full {
            return;
        }
        match gap {
            Some(gap) => {
                entry.clamp_to(gap);
                entry.from_bottom += step.min(entry.remaining(gap));
            }
            None => entry.from_bottom = entry.from_bottom.saturating_add(step),
        }
    }

    /// Reveal the whole gap regardless of prior partial state.
    pub fn expand_all(&mut self, gap_index: usize) {
        self.gaps.entry(gap_index).or_default().full = true;
    }

    /// Clamp provisional counters now that gap bounds are known.
    ///
    /// Entries for gaps that turned out not to exist are dropped.
    pub fn settle(&mut self, gaps: &[Gap]) {
        self.gaps
            .retain(|index, _| gaps.iter().any(|g| g.gap_index == *index));
        for gap in gaps {
            if let Some(entry) = self.gaps.get_mut(&gap.gap_index) {
                entry.clamp_to(gap);
            }
        }
    }

    /// Revealed ranges for a gap.
    pub fn ranges(&self, gap: &Gap) -> ExpandedRanges {
        get_expanded_ranges(gap, &self.get(gap.gap_index))
    }

    /// Whether any gap has been expanded at all.
    pub fn has_expansions(&self) -> bool {
        self.gaps
            .values()
            .any(|e| e.full || e.from_top > 0 || e.from_bottom > 0)
    }
}
