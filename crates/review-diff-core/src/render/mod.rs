//! Row builders for the unified and split views.

mod annotations;
mod pairing;
mod row_map;
mod search;
mod split;
mod unified;
mod walk;

pub use annotations::LineComments;
pub use pairing::{pair_lines, LineCell, SplitPair};
pub use row_map::{Column, LineCoordinate, RowId, RowMap};
pub use search::{number_matches, MatchSequence};
pub use split::{render_split, SplitCell, SplitFile, SplitRow};
pub use unified::{render_unified, LineRow, UnifiedFile, UnifiedRow};
pub use walk::GapRow;

use crate::highlight::DiffHighlighter;
use crate::state::CommentStore;
use serde::{Deserialize, Serialize};

/// Shared inputs of one render pass.
pub struct RenderContext<'a> {
    pub highlighter: &'a mut DiffHighlighter,
    pub comments: &'a CommentStore,
    /// Reset by the caller once per pass.
    pub matches: &'a mut MatchSequence,
    pub query: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Unified,
    Split,
}
