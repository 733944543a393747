//! State of one mounted file view: its gaps, expansion and full file text.

use super::ExpansionTracker;
use crate::action::ViewAction;
use crate::event::ViewEvent;
use crate::fetch::{FileContentRequest, LoadToken};
use crate::model::{compute_gaps, gap_at, DiffFile, DiffSide, Gap};
use crate::state::ExpandedRanges;
use crate::traits::ContextError;

/// Full file text, either fetched or synthesized after a failed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLines {
    pub lines: Vec<String>,
    /// The text is `Line N` placeholders, not real content.
    pub placeholder: bool,
}

impl FileLines {
    fn fetched(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
            placeholder: false,
        }
    }

    fn placeholders(count: u32) -> Self {
        Self {
            lines: (1..=count).map(|n| format!("Line {}", n)).collect(),
            placeholder: true,
        }
    }

    /// Text of a 1-indexed new-side line.
    pub fn line(&self, number: u32) -> Option<&str> {
        let index = usize::try_from(number.checked_sub(1)?).ok()?;
        self.lines.get(index).map(String::as_str)
    }

    pub fn total_lines(&self) -> u32 {
        u32::try_from(self.lines.len()).unwrap_or(u32::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LinesState {
    Unloaded,
    Loading,
    Loaded(FileLines),
}

/// One file view instance.
///
/// Full file text is fetched at most once per instance; a remount gets a
/// fresh view with a fresh [`LoadToken`].
#[derive(Debug, Clone)]
pub struct FileView {
    file: DiffFile,
    token: LoadToken,
    tracker: ExpansionTracker,
    lines: LinesState,
}

impl FileView {
    pub fn new(file: DiffFile, token: LoadToken, expand_step: u32) -> Self {
        Self {
            file,
            token,
            tracker: ExpansionTracker::new(expand_step),
            lines: LinesState::Unloaded,
        }
    }

    pub fn file(&self) -> &DiffFile {
        &self.file
    }

    pub fn path(&self) -> &str {
        &self.file.new_path
    }

    pub fn token(&self) -> LoadToken {
        self.token
    }

    pub fn tracker(&self) -> &ExpansionTracker {
        &self.tracker
    }

    pub fn is_loading(&self) -> bool {
        self.lines == LinesState::Loading
    }

    /// Full file text, once loaded.
    pub fn file_lines(&self) -> Option<&FileLines> {
        match &self.lines {
            LinesState::Loaded(lines) => Some(lines),
            _ => None,
        }
    }

    /// Length of the new-side file, once known.
    pub fn total_lines(&self) -> Option<u32> {
        self.file_lines().map(FileLines::total_lines)
    }

    /// Gaps around the hunks; the trailing gap appears once the length is known.
    pub fn gaps(&self) -> Vec<Gap> {
        compute_gaps(&self.file.hunks, self.total_lines())
    }

    /// Revealed ranges of a gap.
    pub fn ranges(&self, gap: &Gap) -> ExpandedRanges {
        self.tracker.ranges(gap)
    }

    /// Request the full file text unless it is loaded or already in flight.
    pub fn ensure_file_lines(&mut self) -> Option<FileContentRequest> {
        if self.lines != LinesState::Unloaded || self.file.is_binary {
            return None;
        }
        log::debug!("Requesting full content of {}", self.file.new_path);
        self.lines = LinesState::Loading;
        Some(FileContentRequest {
            path: self.file.new_path.clone(),
            token: self.token,
        })
    }

    /// Apply a fetch result. Returns `false` when the result was discarded.
    ///
    /// A failed fetch substitutes `Line N` placeholders up to the highest
    /// new-side line the hunks know about, so expansion keeps working.
    pub fn apply_file_content(
        &mut self,
        token: LoadToken,
        result: Result<String, ContextError>,
    ) -> bool {
        if token != self.token || self.lines != LinesState::Loading {
            log::debug!(
                "Discarding stale content for {} ({:?}, current {:?})",
                self.file.new_path,
                token,
                self.token
            );
            return false;
        }

        let lines = match result {
            Ok(text) => FileLines::fetched(&text),
            Err(e) => {
                log::warn!(
                    "Using placeholder lines for {}: {}",
                    self.file.new_path,
                    e
                );
                FileLines::placeholders(self.max_known_new_line())
            }
        };
        self.lines = LinesState::Loaded(lines);

        let gaps = self.gaps();
        self.tracker.settle(&gaps);
        true
    }

    fn max_known_new_line(&self) -> u32 {
        let from_lines = self.file.max_hunk_line(DiffSide::Add).unwrap_or(0);
        let from_headers = self.file.last_hunk_new_line().unwrap_or(0);
        from_lines.max(from_headers)
    }

    /// Handle an action and return any resulting events.
    pub fn handle_action(&mut self, action: ViewAction) -> Vec<ViewEvent> {
        let mut events = Vec::new();

        let Some(gap_index) = action.gap_index() else {
            events.extend(self.ensure_file_lines().map(ViewEvent::FileContentRequested));
            return events;
        };

        let gaps = self.gaps();
        let gap = gap_at(&gaps, gap_index).copied();
        let bounds_pending =
            self.total_lines().is_none() && gap_index == self.file.hunks.len();
        if gap.is_none() && !bounds_pending {
            log::debug!(
                "Ignoring {:?} on {}: no such gap",
                action,
                self.file.new_path
            );
            return events;
        }

        match action {
            ViewAction::ExpandDown(_) => self.tracker.expand_down(gap_index, gap.as_ref()),
            ViewAction::ExpandUp(_) => self.tracker.expand_up(gap_index, gap.as_ref()),
            ViewAction::ExpandAll(_) => self.tracker.expand_all(gap_index),
            ViewAction::Prefetch => {}
        }

        events.extend(self.ensure_file_lines().map(ViewEvent::FileContentRequested));
        events.push(ViewEvent::ExpansionChanged {
            gap_index,
            remaining: gap.map(|g| self.tracker.get(gap_index).remaining(&g)),
        });
        events
    }
}
