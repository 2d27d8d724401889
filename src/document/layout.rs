//! Layout of the document tree into wrapped terminal lines.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::types::{Block, Document, InlineSpan, InlineStyle, LineType, List, RenderedLine};

const CODE_RIGHT_PADDING: usize = 3;
const QUOTE_PREFIX: &str = "│ ";

impl Document {
    /// Lay the document out for a viewport `width` columns wide.
    ///
    /// Blocks are separated by one empty line. List items carry their
    /// marker as a hanging prefix; wrapped lines align under the item text.
    pub fn layout(&self, width: usize) -> Vec<RenderedLine> {
        let mut lines = layout_blocks(self.blocks(), width.max(1));
        while matches!(lines.last().map(RenderedLine::line_type), Some(LineType::Empty)) {
            lines.pop();
        }
        lines
    }
}

/// Lay out a run of sibling blocks, each followed by an empty line.
fn layout_blocks(blocks: &[Block], width: usize) -> Vec<RenderedLine> {
    let mut lines = Vec::new();
    for block in blocks {
        layout_block(block, width, &mut lines);
        lines.push(RenderedLine::new(String::new(), LineType::Empty));
    }
    lines
}

fn layout_block(block: &Block, width: usize, lines: &mut Vec<RenderedLine>) {
    match block {
        Block::Heading { level, inlines } => {
            let prefix = format!("{} ", "#".repeat(usize::from(*level)));
            let indent = " ".repeat(prefix.len());
            push_wrapped(lines, inlines, width, &prefix, &indent, LineType::Heading(*level));
        }
        Block::Paragraph(inlines) => {
            push_wrapped(lines, inlines, width, "", "", LineType::Paragraph);
        }
        Block::List(list) => layout_list(list, "", width, lines),
        Block::CodeBlock { info, literal } => {
            layout_code_block(info.as_deref(), literal, width, lines);
        }
        Block::BlockQuote(children) => {
            let inner_width = width.saturating_sub(display_width(QUOTE_PREFIX)).max(1);
            let mut inner = layout_blocks(children, inner_width);
            while matches!(inner.last().map(RenderedLine::line_type), Some(LineType::Empty)) {
                inner.pop();
            }
            lines.extend(prefix_lines(inner, QUOTE_PREFIX, QUOTE_PREFIX, Some(LineType::BlockQuote)));
        }
        Block::ThematicBreak => {
            lines.push(RenderedLine::new("─".repeat(width), LineType::HorizontalRule));
        }
        Block::Table { rows, has_header } => {
            for line in render_table(rows, *has_header, width) {
                lines.push(RenderedLine::new(line, LineType::Table));
            }
        }
    }
}

/// `indent` is the parent item's continuation prefix, empty at top level.
fn layout_list(list: &List, indent: &str, width: usize, lines: &mut Vec<RenderedLine>) {
    let line_type = LineType::ListItem(list.depth);
    for item in &list.items {
        let marker = match item.task {
            Some(true) => "✓",
            Some(false) => "□",
            None => item.marker.as_str(),
        };
        let prefix_first = format!("{indent}{marker} ");
        let prefix_next = " ".repeat(display_width(&prefix_first));
        let text_width = width.saturating_sub(display_width(&prefix_first)).max(1);

        let mut rendered_any = false;
        let mut rendered_paragraphs = 0usize;
        for block in &item.blocks {
            if let Block::List(child) = block {
                layout_list(child, &prefix_next, width, lines);
                continue;
            }
            let is_paragraph = matches!(block, Block::Paragraph(_));
            if is_paragraph && rendered_paragraphs > 0 {
                lines.push(RenderedLine::new(String::new(), line_type));
            }

            let mut block_lines = Vec::new();
            layout_block(block, text_width, &mut block_lines);
            let prefix = if rendered_any { &prefix_next } else { &prefix_first };
            let retype = is_paragraph.then_some(line_type);
            lines.extend(prefix_lines(block_lines, prefix, &prefix_next, retype));

            rendered_any = true;
            rendered_paragraphs += usize::from(is_paragraph);
        }

        if !rendered_any {
            lines.push(RenderedLine::new(prefix_first, line_type));
        }
    }
}

fn layout_code_block(info: Option<&str>, literal: &str, width: usize, lines: &mut Vec<RenderedLine>) {
    let content_width = literal
        .lines()
        .map(display_width)
        .max()
        .unwrap_or(0)
        .min(width.saturating_sub(4 + CODE_RIGHT_PADDING).max(1));
    let label = format!(" {} ", info.unwrap_or("code"));
    let frame_inner_width = content_width + 2 + CODE_RIGHT_PADDING;
    let visible_label: String = label.chars().take(frame_inner_width).collect();
    lines.push(RenderedLine::new(
        format!(
            "┌{visible_label}{}┐",
            "─".repeat(frame_inner_width.saturating_sub(display_width(&visible_label)))
        ),
        LineType::CodeBlock,
    ));

    let code_style = InlineStyle {
        code: true,
        ..InlineStyle::default()
    };
    for raw_line in literal.lines() {
        let body = truncate_text(raw_line, content_width);
        let padding = " ".repeat(content_width.saturating_sub(display_width(&body)) + CODE_RIGHT_PADDING);
        let spans = vec![
            InlineSpan::plain("│ "),
            InlineSpan::new(body, code_style),
            InlineSpan::plain(format!("{padding} │")),
        ];
        lines.push(RenderedLine::with_spans(spans_to_string(&spans), LineType::CodeBlock, spans));
    }

    lines.push(RenderedLine::new(
        format!("└{}┘", "─".repeat(frame_inner_width)),
        LineType::CodeBlock,
    ));
}

fn push_wrapped(
    lines: &mut Vec<RenderedLine>,
    spans: &[InlineSpan],
    width: usize,
    prefix_first: &str,
    prefix_next: &str,
    line_type: LineType,
) {
    for line_spans in wrap_spans(spans, width, prefix_first, prefix_next) {
        let content = spans_to_string(&line_spans);
        lines.push(RenderedLine::with_spans(content, line_type, line_spans));
    }
}

/// Prepend `first` to the first line and `next` to the rest, optionally
/// retyping every line.
fn prefix_lines(
    lines: Vec<RenderedLine>,
    first: &str,
    next: &str,
    retype: Option<LineType>,
) -> Vec<RenderedLine> {
    lines
        .into_iter()
        .enumerate()
        .map(|(idx, line)| {
            let prefix = if idx == 0 { first } else { next };
            let line_type = retype.unwrap_or(*line.line_type());
            let mut spans = Vec::new();
            if !prefix.is_empty() {
                spans.push(InlineSpan::plain(prefix));
            }
            match line.spans() {
                Some(existing) => spans.extend_from_slice(existing),
                None if !line.content().is_empty() => spans.push(InlineSpan::plain(line.content())),
                None => {}
            }
            RenderedLine::with_spans(spans_to_string(&spans), line_type, spans)
        })
        .collect()
}

/// Greedy word wrap over styled spans.
///
/// Line breaks inside the spans are treated as ordinary whitespace.
fn wrap_spans(
    spans: &[InlineSpan],
    width: usize,
    prefix_first: &str,
    prefix_next: &str,
) -> Vec<Vec<InlineSpan>> {
    let tokens: Vec<InlineSpan> = spans.iter().flat_map(split_inline_tokens).collect();

    let mut lines: Vec<Vec<InlineSpan>> = Vec::new();
    let mut current: Vec<InlineSpan> = Vec::new();
    let mut current_len = 0usize;
    let mut has_word = false;

    let start_line = |prefix: &str, current: &mut Vec<InlineSpan>, current_len: &mut usize| {
        current.clear();
        *current_len = display_width(prefix);
        if !prefix.is_empty() {
            current.push(InlineSpan::plain(prefix));
        }
    };

    start_line(prefix_first, &mut current, &mut current_len);

    for token in tokens {
        let token_len = display_width(token.text());
        let token_is_ws = token.text().chars().all(char::is_whitespace);

        if current_len + token_len > width && has_word && !token_is_ws {
            trim_trailing_whitespace(&mut current);
            lines.push(std::mem::take(&mut current));
            start_line(prefix_next, &mut current, &mut current_len);
            has_word = false;
        }

        if token_is_ws {
            // Drop leading whitespace at wrapped line starts.
            if !has_word {
                continue;
            }
            current_len += 1;
            current.push(InlineSpan::new(" ".to_string(), token.style()));
        } else {
            current_len += token_len;
            current.push(token);
            has_word = true;
        }
    }

    trim_trailing_whitespace(&mut current);
    lines.push(current);
    lines
}

fn trim_trailing_whitespace(line: &mut Vec<InlineSpan>) {
    while line.len() > 1 && line.last().is_some_and(|span| span.text().trim().is_empty()) {
        line.pop();
    }
}

/// Split a span into alternating whitespace and word tokens.
fn split_inline_tokens(span: &InlineSpan) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut ws_state: Option<bool> = None;

    for ch in span.text().chars() {
        let is_ws = ch.is_whitespace();
        if ws_state.is_some_and(|state| state != is_ws) {
            out.push(InlineSpan::new(std::mem::take(&mut buf), span.style()));
        }
        buf.push(ch);
        ws_state = Some(is_ws);
    }

    if !buf.is_empty() {
        out.push(InlineSpan::new(buf, span.style()));
    }
    out
}

fn spans_to_string(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::text).collect()
}

fn render_table(rows: &[Vec<String>], has_header: bool, width: usize) -> Vec<String> {
    let num_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    if num_cols == 0 {
        return Vec::new();
    }

    let mut col_widths = vec![1_usize; num_cols];
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            col_widths[idx] = col_widths[idx].max(display_width(cell));
        }
    }

    // Row width is 1 + sum(col_width + 3).
    let max_table_width = width.max(4);
    while 1 + col_widths.iter().sum::<usize>() + 3 * num_cols > max_table_width {
        let Some((widest, &w)) = col_widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
            break;
        };
        if w <= 1 {
            break;
        }
        col_widths[widest] -= 1;
    }

    let mut lines = vec![table_border(&col_widths, '┌', '┬', '┐')];
    for (idx, row) in rows.iter().enumerate() {
        lines.push(table_row(row, &col_widths));
        if has_header && idx == 0 {
            lines.push(table_border(&col_widths, '├', '┼', '┤'));
        }
    }
    lines.push(table_border(&col_widths, '└', '┴', '┘'));
    lines
}

fn table_border(widths: &[usize], left: char, middle: char, right: char) -> String {
    let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}", inner.join(&middle.to_string()))
}

fn table_row(cells: &[String], widths: &[usize]) -> String {
    let mut out = String::from("│");
    for (idx, width) in widths.iter().enumerate() {
        let content = truncate_text(cells.get(idx).map_or("", String::as_str), *width);
        let padding = width.saturating_sub(display_width(&content));
        out.push(' ');
        out.push_str(&content);
        out.push_str(&" ".repeat(padding));
        out.push_str(" │");
    }
    out
}

fn truncate_text(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut width = 0usize;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width {
            break;
        }
        out.push(ch);
        width += ch_width;
    }
    out
}

fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

#[cfg(test)]
mod tests {
    use crate::document::{Document, LineType};

    fn contents(source: &str, width: usize) -> Vec<String> {
        Document::parse(source)
            .layout(width)
            .iter()
            .map(|line| line.content().to_string())
            .collect()
    }

    #[test]
    fn test_heading_has_level_prefix() {
        let lines = Document::parse("## Title").layout(40);
        assert_eq!(lines[0].content(), "## Title");
        assert_eq!(lines[0].line_type(), &LineType::Heading(2));
    }

    #[test]
    fn test_paragraph_wraps_at_width() {
        let lines = contents("one two three four", 9);
        assert_eq!(lines, vec!["one two", "three", "four"]);
    }

    #[test]
    fn test_soft_break_becomes_space() {
        assert_eq!(contents("one\ntwo", 40), vec!["one two"]);
    }

    #[test]
    fn test_blocks_separated_by_empty_line() {
        let lines = Document::parse("# A\n\ntext").layout(40);
        let types: Vec<LineType> = lines.iter().map(|l| *l.line_type()).collect();
        assert_eq!(
            types,
            vec![LineType::Heading(1), LineType::Empty, LineType::Paragraph]
        );
    }

    #[test]
    fn test_unordered_list_uses_depth_markers() {
        let lines = contents("- a\n  - b\n    - c\n", 40);
        assert_eq!(lines, vec!["• a", "  ○ b", "    ▪ c"]);
    }

    #[test]
    fn test_list_item_wraps_under_text() {
        let lines = contents("- alpha beta gamma", 12);
        assert_eq!(lines, vec!["• alpha beta", "  gamma"]);
    }

    #[test]
    fn test_list_line_types_carry_depth() {
        let lines = Document::parse("- a\n  - b\n").layout(40);
        assert_eq!(lines[0].line_type(), &LineType::ListItem(0));
        assert_eq!(lines[1].line_type(), &LineType::ListItem(1));
    }

    #[test]
    fn test_ordered_list_numbers() {
        let lines = contents("1. one\n2. two\n", 40);
        assert_eq!(lines, vec!["1. one", "2. two"]);
    }

    #[test]
    fn test_nested_list_aligns_under_wide_marker() {
        let lines = contents("10. ten\n    - sub\n", 40);
        assert_eq!(lines, vec!["10. ten", "    ○ sub"]);
    }

    #[test]
    fn test_nested_list_under_task_item() {
        let lines = contents("- [ ] todo\n  - step\n", 40);
        assert_eq!(lines, vec!["□ todo", "  ○ step"]);
    }

    #[test]
    fn test_task_items_show_boxes() {
        let lines = contents("- [ ] todo\n- [x] done\n", 40);
        assert_eq!(lines, vec!["□ todo", "✓ done"]);
    }

    #[test]
    fn test_code_block_frame() {
        let lines = Document::parse("```rust\nlet x = 1;\n```\n").layout(40);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].content().starts_with("┌ rust "));
        assert!(lines[1].content().starts_with("│ let x = 1;"));
        assert!(lines[1].content().ends_with(" │"));
        assert!(lines[2].content().starts_with('└'));
        assert!(lines.iter().all(|l| l.line_type() == &LineType::CodeBlock));
        let code = &lines[1].spans().expect("code spans")[1];
        assert!(code.style().code);
    }

    #[test]
    fn test_blockquote_prefix() {
        let lines = Document::parse("> quoted text").layout(40);
        assert_eq!(lines[0].content(), "│ quoted text");
        assert_eq!(lines[0].line_type(), &LineType::BlockQuote);
    }

    #[test]
    fn test_nested_blockquote_stacks_prefix() {
        let lines = contents("> outer\n>\n> > inner\n", 40);
        assert_eq!(lines, vec!["│ outer", "│ ", "│ │ inner"]);
    }

    #[test]
    fn test_thematic_break_spans_width() {
        let lines = Document::parse("---").layout(5);
        assert_eq!(lines[0].content(), "─────");
        assert_eq!(lines[0].line_type(), &LineType::HorizontalRule);
    }

    #[test]
    fn test_table_borders() {
        let lines = contents("| a | b |\n|---|---|\n| 1 | 2 |\n", 40);
        assert_eq!(
            lines,
            vec![
                "┌───┬───┐",
                "│ a │ b │",
                "├───┼───┤",
                "│ 1 │ 2 │",
                "└───┴───┘",
            ]
        );
    }

    #[test]
    fn test_empty_document_has_no_lines() {
        assert!(Document::parse("").layout(40).is_empty());
    }
}
