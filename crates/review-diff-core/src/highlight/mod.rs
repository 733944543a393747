//! Syntax highlighting of diff blocks and per-line re-segmentation.

mod highlighter;
mod resegment;

pub use highlighter::DiffHighlighter;
pub use resegment::{escape_html, plain_lines, split_highlighted_lines, strip_markup};
