//! File View Actions
//!
//! Tagged actions a file view can process. The orchestrating surface maps
//! clicks and key presses to these and dispatches them to the view state.

/// Actions that can be performed on a single file view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    // === Context Expansion ===
    /// Reveal the next lines below the top edge of a gap
    ExpandDown(usize),
    /// Reveal the next lines above the bottom edge of a gap
    ExpandUp(usize),
    /// Reveal the whole gap
    ExpandAll(usize),

    // === Loading ===
    /// Fetch full file content ahead of any expansion (file entered the viewport)
    Prefetch,
}

impl ViewAction {
    /// Gap targeted by an expansion action.
    pub fn gap_index(&self) -> Option<usize> {
        match self {
            ViewAction::ExpandDown(index)
            | ViewAction::ExpandUp(index)
            | ViewAction::ExpandAll(index) => Some(*index),
            ViewAction::Prefetch => None,
        }
    }

    /// Check if this action changes the expansion state
    pub fn is_expansion(&self) -> bool {
        self.gap_index().is_some()
    }
}
