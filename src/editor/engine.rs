//! Markdown-aware editing conveniences.
//!
//! Every function here is a pure transformation of a rope and a selection
//! into an [`Edit`]: an optional [`Change`] plus the selection that should
//! be restored once the change is visible. Nothing here touches the buffer.

use ropey::Rope;

use super::buffer::{Change, Selection};

/// One level of indentation.
pub const INDENT_UNIT: &str = "  ";

/// The bullet continued onto a new line.
pub const BULLET: &str = "- ";

/// Result of an editing-engine operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub change: Option<Change>,
    pub selection: Selection,
}

impl Edit {
    const fn unchanged(selection: Selection) -> Self {
        Self {
            change: None,
            selection,
        }
    }

    /// Apply the change to a string and return the result.
    pub fn apply_to(&self, text: &str) -> String {
        let mut rope = Rope::from_str(text);
        match &self.change {
            Some(Change::Insert { at, text }) => rope.insert(*at, text),
            Some(Change::Remove { range }) => rope.remove(range.clone()),
            None => {}
        }
        rope.to_string()
    }
}

/// React to a text change in the content buffer.
///
/// `rope` and `cursor` describe the buffer after the raw keystroke was
/// applied; `inserted` says whether that keystroke typed text (as opposed
/// to deleting or pasting). When a newline was just typed after a bullet
/// line, the bullet (with the same indent) is continued on the new line.
pub fn handle_text_change(rope: &Rope, cursor: usize, inserted: bool) -> Edit {
    let cursor = cursor.min(rope.len_chars());
    let caret = Selection::caret(cursor);
    if !inserted || cursor == 0 || rope.char(cursor - 1) != '\n' {
        return Edit::unchanged(caret);
    }

    let previous_line = line_ending_at(rope, cursor - 1);
    // Both sides are trimmed: an empty "- " item does not continue.
    if !previous_line.trim().starts_with(BULLET) {
        return Edit::unchanged(caret);
    }

    let indent: String = previous_line
        .chars()
        .take_while(|c| c.is_whitespace())
        .collect();
    let text = format!("{indent}{BULLET}");
    let advance = text.chars().count();
    Edit {
        change: Some(Change::Insert { at: cursor, text }),
        selection: Selection::caret(cursor + advance),
    }
}

/// Tab: indent the line holding `selection.start` by one unit.
///
/// The unit goes directly after the line's existing indent, so the caret
/// and any selected text shift right by exactly its width.
pub fn indent(rope: &Rope, selection: Selection) -> Edit {
    let selection = selection.clamped(rope.len_chars());
    let (line_start, indent_len) = indent_before(rope, selection.start);
    let width = INDENT_UNIT.chars().count();
    Edit {
        change: Some(Change::Insert {
            at: line_start + indent_len,
            text: INDENT_UNIT.to_string(),
        }),
        selection: Selection::new(selection.start + width, selection.end + width),
    }
}

/// Shift+Tab: remove one trailing indent unit from the line holding
/// `selection.start`.
///
/// An indent that does not end in a full unit is left alone.
pub fn outdent(rope: &Rope, selection: Selection) -> Edit {
    let selection = selection.clamped(rope.len_chars());
    let (line_start, indent_len) = indent_before(rope, selection.start);
    let indent = rope.slice(line_start..line_start + indent_len).to_string();
    if !indent.ends_with(INDENT_UNIT) {
        return Edit::unchanged(selection);
    }

    let width = INDENT_UNIT.chars().count();
    let end = line_start + indent_len;
    Edit {
        change: Some(Change::Remove {
            range: end - width..end,
        }),
        selection: Selection::new(selection.start - width, selection.end - width),
    }
}

/// Start of the line containing `offset`. Only `'\n'` ends a line.
fn line_start(rope: &Rope, offset: usize) -> usize {
    let back = rope
        .chars_at(offset)
        .reversed()
        .take_while(|c| *c != '\n')
        .count();
    offset - back
}

/// Text of the line whose terminating newline sits at `newline_idx`.
fn line_ending_at(rope: &Rope, newline_idx: usize) -> String {
    let start = line_start(rope, newline_idx);
    rope.slice(start..newline_idx).to_string()
}

/// Start of the line containing `offset`, and the length of the leading
/// whitespace between that start and `offset`.
fn indent_before(rope: &Rope, offset: usize) -> (usize, usize) {
    let line_start = line_start(rope, offset);
    let indent_len = rope
        .slice(line_start..offset)
        .chars()
        .take_while(|c| c.is_whitespace())
        .count();
    (line_start, indent_len)
}
