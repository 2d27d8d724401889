use std::ops::Range;

use ropey::Rope;

/// A selection in the editor buffer, expressed as char offsets.
///
/// A collapsed selection (`start == end`) is a plain caret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Create a selection, ordering the endpoints.
    pub const fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// A collapsed selection at `offset`.
    pub const fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub const fn is_caret(&self) -> bool {
        self.start == self.end
    }

    /// Clamp both endpoints into `0..=len`.
    #[must_use]
    pub fn clamped(self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }

    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// A single text mutation against a rope, in char offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Insert { at: usize, text: String },
    Remove { range: Range<usize> },
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A text buffer backed by a rope data structure.
///
/// Offsets are char indices. The selection is always kept within
/// `0..=len_chars()`.
#[derive(Clone)]
pub struct EditorBuffer {
    rope: Rope,
    selection: Selection,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
    dirty: bool,
}

impl EditorBuffer {
    /// Create a new buffer from a string, caret at the start.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection: Selection::caret(0),
            col_memory: 0,
            dirty: false,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    pub const fn rope(&self) -> &Rope {
        &self.rope
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Caret position (start of the selection).
    pub const fn cursor(&self) -> usize {
        self.selection.start
    }

    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Replace the selection, clamping it to the buffer.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamped(self.rope.len_chars());
        self.col_memory = self.cursor_line_col().1;
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let s = self.rope.line(line_idx).to_string();
        Some(s.trim_end_matches('\n').trim_end_matches('\r').to_string())
    }

    /// Length of a line in chars (without trailing newline).
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.chars().count())
    }

    /// Zero-based (line, column) of the caret, column in chars.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let cursor = self.cursor().min(self.rope.len_chars());
        let line = self.rope.char_to_line(cursor);
        (line, cursor - self.rope.line_to_char(line))
    }

    /// Apply a raw change. The selection is clamped to the new length
    /// but otherwise left where it was.
    pub fn apply(&mut self, change: &Change) {
        let len = self.rope.len_chars();
        match change {
            Change::Insert { at, text } => {
                if text.is_empty() {
                    return;
                }
                self.rope.insert((*at).min(len), text);
            }
            Change::Remove { range } => {
                let start = range.start.min(len);
                let end = range.end.min(len);
                if start >= end {
                    return;
                }
                self.rope.remove(start..end);
            }
        }
        self.selection = self.selection.clamped(self.rope.len_chars());
        self.dirty = true;
    }

    /// Insert a character at the cursor, replacing any selection.
    pub fn insert_char(&mut self, ch: char) {
        self.delete_selection();
        let at = self.cursor();
        self.rope.insert_char(at, ch);
        self.collapse_to(at + 1);
        self.dirty = true;
    }

    /// Insert a string at the cursor, replacing any selection.
    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.delete_selection();
        let at = self.cursor();
        self.rope.insert(at, s);
        self.collapse_to(at + s.chars().count());
        self.dirty = true;
    }

    /// Split the current line at the cursor (Enter key).
    pub fn split_line(&mut self) {
        self.insert_char('\n');
    }

    /// Delete the selection, or the character before the cursor (Backspace).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let at = self.cursor();
        if at == 0 {
            return false;
        }
        self.rope.remove(at - 1..at);
        self.collapse_to(at - 1);
        self.dirty = true;
        true
    }

    /// Delete the selection, or the character at the cursor (Delete key).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let at = self.cursor();
        if at >= self.rope.len_chars() {
            return false;
        }
        self.rope.remove(at..=at);
        self.dirty = true;
        true
    }

    /// Move the cursor in the given direction.
    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                let at = self.cursor();
                self.collapse_to(at.saturating_sub(1));
            }
            Direction::Right => {
                let at = (self.selection.end + 1).min(self.rope.len_chars());
                self.collapse_to(at);
            }
            Direction::Up => {
                let (line, _) = self.cursor_line_col();
                if line > 0 {
                    self.move_vertical(line - 1);
                }
            }
            Direction::Down => {
                let (line, _) = self.cursor_line_col();
                if line + 1 < self.line_count() {
                    self.move_vertical(line + 1);
                }
            }
        }
    }

    /// Grow the selection one char to the left or right (Shift+arrow).
    ///
    /// Vertical directions collapse and move like [`Self::move_cursor`].
    pub fn extend_selection(&mut self, direction: Direction) {
        let Selection { start, end } = self.selection;
        match direction {
            Direction::Left => self.selection = Selection::new(start.saturating_sub(1), end),
            Direction::Right => {
                self.selection = Selection::new(start, (end + 1).min(self.rope.len_chars()));
            }
            Direction::Up | Direction::Down => self.move_cursor(direction),
        }
    }

    /// Move cursor to the beginning of the line (Home).
    pub fn move_home(&mut self) {
        let (line, _) = self.cursor_line_col();
        self.collapse_to(self.rope.line_to_char(line));
    }

    /// Move cursor to the end of the line (End).
    pub fn move_end(&mut self) {
        let (line, _) = self.cursor_line_col();
        self.collapse_to(self.rope.line_to_char(line) + self.line_len(line));
    }

    /// Move cursor to a specific line and column, clamped to the buffer.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let line = line.min(self.line_count().saturating_sub(1));
        let col = col.min(self.line_len(line));
        self.collapse_to(self.rope.line_to_char(line) + col);
    }

    /// Move cursor to the start of the buffer (Ctrl+Home).
    pub fn move_to_start(&mut self) {
        self.collapse_to(0);
    }

    /// Move cursor to the end of the buffer (Ctrl+End).
    pub fn move_to_end(&mut self) {
        self.collapse_to(self.rope.len_chars());
    }

    // --- Private helpers ---

    fn collapse_to(&mut self, offset: usize) {
        self.selection = Selection::caret(offset.min(self.rope.len_chars()));
        self.col_memory = self.cursor_line_col().1;
    }

    fn move_vertical(&mut self, target_line: usize) {
        let memory = self.col_memory;
        let col = memory.min(self.line_len(target_line));
        self.selection = Selection::caret(self.rope.line_to_char(target_line) + col);
        self.col_memory = memory;
    }

    fn delete_selection(&mut self) -> bool {
        if self.selection.is_caret() {
            return false;
        }
        let range = self.selection.clamped(self.rope.len_chars()).range();
        let start = range.start;
        self.rope.remove(range);
        self.collapse_to(start);
        self.dirty = true;
        true
    }
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("selection", &self.selection)
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Construction and basic queries ---

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = EditorBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_from_text_trailing_newline() {
        let buf = EditorBuffer::from_text("hello\n");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_at(1), Some(String::new()));
    }

    #[test]
    fn test_line_at_out_of_bounds_returns_none() {
        let buf = EditorBuffer::from_text("hello");
        assert_eq!(buf.line_at(1), None);
    }

    #[test]
    fn test_line_len_counts_chars() {
        let buf = EditorBuffer::from_text("café\nhi");
        assert_eq!(buf.line_len(0), 4);
        assert_eq!(buf.line_len(1), 2);
    }

    #[test]
    fn test_cursor_starts_at_origin() {
        let buf = EditorBuffer::from_text("hello\nworld");
        assert_eq!(buf.cursor(), 0);
        assert_eq!(buf.cursor_line_col(), (0, 0));
    }

    // --- Selection ---

    #[test]
    fn test_selection_new_orders_endpoints() {
        assert_eq!(Selection::new(5, 2), Selection { start: 2, end: 5 });
    }

    #[test]
    fn test_set_selection_clamps_to_length() {
        let mut buf = EditorBuffer::from_text("abc");
        buf.set_selection(Selection::new(1, 99));
        assert_eq!(buf.selection(), Selection::new(1, 3));
    }

    // --- Dirty tracking ---

    #[test]
    fn test_insert_marks_dirty() {
        let mut buf = EditorBuffer::from_text("hello");
        assert!(!buf.is_dirty());
        buf.insert_char('!');
        assert!(buf.is_dirty());
        buf.mark_clean();
        assert!(!buf.is_dirty());
    }

    // --- Insertion ---

    #[test]
    fn test_insert_char_advances_cursor() {
        let mut buf = EditorBuffer::from_text("hllo");
        buf.move_cursor(Direction::Right);
        buf.insert_char('e');
        assert_eq!(buf.text(), "hello");
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn test_insert_multibyte_char() {
        let mut buf = EditorBuffer::from_text("caf");
        buf.move_to_end();
        buf.insert_char('é');
        assert_eq!(buf.text(), "café");
        assert_eq!(buf.cursor(), 4);
    }

    #[test]
    fn test_insert_str_multiline_moves_to_end_of_insert() {
        let mut buf = EditorBuffer::from_text("ab");
        buf.move_cursor(Direction::Right);
        buf.insert_str("x\ny");
        assert_eq!(buf.text(), "ax\nyb");
        assert_eq!(buf.cursor_line_col(), (1, 1));
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.set_selection(Selection::new(0, 5));
        buf.insert_char('J');
        assert_eq!(buf.text(), "J world");
        assert_eq!(buf.cursor(), 1);
    }

    #[test]
    fn test_split_line_in_middle() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.move_to(0, 5);
        buf.split_line();
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_at(1), Some(" world".to_string()));
        assert_eq!(buf.cursor_line_col(), (1, 0));
    }

    // --- Deletion ---

    #[test]
    fn test_delete_back_at_start_is_noop() {
        let mut buf = EditorBuffer::from_text("hello");
        assert!(!buf.delete_back());
        assert_eq!(buf.text(), "hello");
    }

    #[test]
    fn test_delete_back_joins_lines() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(1, 0);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "helloworld");
        assert_eq!(buf.cursor(), 5);
    }

    #[test]
    fn test_delete_back_multibyte() {
        let mut buf = EditorBuffer::from_text("café");
        buf.move_to_end();
        buf.delete_back();
        assert_eq!(buf.text(), "caf");
    }

    #[test]
    fn test_delete_forward_at_end_is_noop() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_end();
        assert!(!buf.delete_forward());
    }

    #[test]
    fn test_delete_forward_removes_selection() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.set_selection(Selection::new(1, 4));
        assert!(buf.delete_forward());
        assert_eq!(buf.text(), "ho");
        assert_eq!(buf.cursor(), 1);
    }

    // --- Raw changes ---

    #[test]
    fn test_apply_insert_keeps_selection_in_place() {
        let mut buf = EditorBuffer::from_text("- a\n");
        buf.move_to_end();
        buf.apply(&Change::Insert {
            at: 4,
            text: "- ".to_string(),
        });
        assert_eq!(buf.text(), "- a\n- ");
        assert_eq!(buf.cursor(), 4);
        assert!(buf.is_dirty());
    }

    #[test]
    fn test_apply_remove_clamps_selection() {
        let mut buf = EditorBuffer::from_text("abcdef");
        buf.move_to_end();
        buf.apply(&Change::Remove { range: 2..6 });
        assert_eq!(buf.text(), "ab");
        assert_eq!(buf.cursor(), 2);
    }

    // --- Cursor movement ---

    #[test]
    fn test_move_left_wraps_to_prev_line() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(1, 0);
        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor_line_col(), (0, 5));
    }

    #[test]
    fn test_move_right_at_end_is_noop() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_end();
        buf.move_cursor(Direction::Right);
        assert_eq!(buf.cursor(), 5);
    }

    #[test]
    fn test_move_up_clamps_to_shorter_line() {
        let mut buf = EditorBuffer::from_text("hi\nhello");
        buf.move_to(1, 4);
        buf.move_cursor(Direction::Up);
        assert_eq!(buf.cursor_line_col(), (0, 2));
    }

    #[test]
    fn test_column_memory_across_short_line() {
        let mut buf = EditorBuffer::from_text("hello\nhi\nworld");
        buf.move_to(0, 4);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor_line_col(), (1, 2));
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor_line_col(), (2, 4));
    }

    #[test]
    fn test_extend_selection_grows_both_ways() {
        let mut buf = EditorBuffer::from_text("abcd");
        buf.set_selection(Selection::caret(2));
        buf.extend_selection(Direction::Right);
        buf.extend_selection(Direction::Left);
        assert_eq!(buf.selection(), Selection::new(1, 3));
        buf.extend_selection(Direction::Right);
        buf.extend_selection(Direction::Right);
        assert_eq!(buf.selection(), Selection::new(1, 4));
    }

    #[test]
    fn test_home_and_end() {
        let mut buf = EditorBuffer::from_text("one\ntwo three");
        buf.move_to(1, 4);
        buf.move_home();
        assert_eq!(buf.cursor_line_col(), (1, 0));
        buf.move_end();
        assert_eq!(buf.cursor_line_col(), (1, 9));
    }

    #[test]
    fn test_move_to_clamps() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_to(100, 100);
        assert_eq!(buf.cursor_line_col(), (0, 5));
    }
}
