//! State management for file views, comments and review sessions.

mod comments;
mod expansion;
mod file_view;
mod session;

pub use comments::{
    CommentCounts, CommentLoadError, CommentLoadState, CommentStore, GutterIndicator,
};
pub use expansion::{
    get_expanded_ranges, ExpandedRanges, ExpansionTracker, GapExpansion, LineRange,
    DEFAULT_EXPAND_STEP,
};
pub use file_view::{FileLines, FileView};
pub use session::{RenderedFile, ReviewSession, SessionError, SessionOptions};
