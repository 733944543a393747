//! Comment placement and review bookkeeping.

mod coordinates;
mod viewed;

pub use coordinates::{clamp_line, CommentIndex, CoordinateKey, LineBounds};
pub use viewed::{content_hash, djb2, viewed_status, Djb2, ViewedStatus};
