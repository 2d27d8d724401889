//! Markdown document parsing and rendering.
//!
//! This module handles:
//! - Parsing markdown with comrak into a block tree
//! - Choosing list markers by nesting depth
//! - Laying the tree out as styled lines for display

mod layout;
mod parser;
mod types;

pub use parser::parse;
pub use types::{
    BULLET_MARKERS, Block, Document, InlineSpan, InlineStyle, LineType, List, ListItem, ListKind,
    RenderedLine, bullet_marker,
};

/// Length of the memo card excerpt, in chars.
pub const EXCERPT_CHARS: usize = 150;

/// Shorten `content` to at most `max_chars` chars, marking the cut with
/// `"..."`.
pub fn excerpt(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &content[..byte_idx]),
        None => content.to_string(),
    }
}
