use chrono::Local;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::{Focus, Model, Screen};
use crate::document::{self, Document, EXCERPT_CHARS, RenderedLine};
use crate::editor::{EditorBuffer, Selection};
use crate::store::{Memo, User};

use super::style::{
    border_style, cursor_style, gutter_style, muted_style, selection_style, style_for_inline,
    style_for_line_type,
};
use super::{FORM_WIDTH_PERCENT, LIST_WIDTH_PERCENT, overlays, status};

/// Rows used by one memo card: title, excerpt, timestamp, spacer.
const MEMO_CARD_ROWS: usize = 4;

pub fn split_main_columns(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(LIST_WIDTH_PERCENT),
            Constraint::Percentage(FORM_WIDTH_PERCENT),
        ])
        .split(area)
}

/// Render the complete UI.
///
/// Takes the model mutably only to clamp the preview scroll against the
/// laid-out document height.
pub fn render(model: &mut Model, frame: &mut Frame) {
    let area = frame.area();

    let banner_active = model.error.is_some();
    let toast_active = model.active_toast().is_some();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(u16::from(banner_active)),
            Constraint::Min(1),
            Constraint::Length(u16::from(toast_active)),
            Constraint::Length(1),
        ])
        .split(area);

    status::render_header(model, frame, rows[0]);
    if banner_active {
        status::render_error_banner(model, frame, rows[1]);
    }

    let columns = split_main_columns(rows[2]);
    frame.render_widget(Clear, rows[2]);
    match model.screen {
        Screen::Memos => {
            render_memo_list(model, frame, columns[0]);
            render_memo_form(model, frame, columns[1]);
        }
        Screen::Users => {
            render_user_list(model, frame, columns[0]);
            render_user_form(model, frame, columns[1]);
        }
    }

    if toast_active {
        status::render_toast_bar(model, frame, rows[3]);
    }
    status::render_status_bar(model, frame, rows[4]);

    if model.pending_delete.is_some() {
        overlays::render_delete_confirm(model, frame, area);
    }
}

fn list_block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(focused))
}

fn render_memo_list(model: &Model, frame: &mut Frame, area: Rect) {
    let block = list_block(
        format!("Memos ({})", model.memos.len()),
        model.focus == Focus::List,
    );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if model.memos.is_empty() {
        let empty = Paragraph::new("No memos yet. Press n to write one.").style(muted_style());
        frame.render_widget(empty, inner);
        return;
    }

    let visible_cards = (usize::from(inner.height) / MEMO_CARD_ROWS).max(1);
    let first = first_visible(model.memo_selected, visible_cards);
    let lines: Vec<Line> = model
        .memos
        .iter()
        .enumerate()
        .skip(first)
        .take(visible_cards)
        .flat_map(|(idx, memo)| memo_card(memo, idx == model.memo_selected))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn memo_card(memo: &Memo, selected: bool) -> [Line<'static>; MEMO_CARD_ROWS] {
    let marker = if selected { ">" } else { " " };
    let title_style = if selected {
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let updated = memo
        .updated_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M");
    [
        Line::from(vec![
            Span::raw(format!("{marker} ")),
            Span::styled(memo.title.clone(), title_style),
        ]),
        Line::raw(format!("  {}", card_excerpt(&memo.content))),
        Line::styled(format!("  {updated}"), muted_style()),
        Line::raw(""),
    ]
}

/// The card excerpt: markup stripped, flattened onto one line.
fn card_excerpt(content: &str) -> String {
    document::excerpt(&Document::parse(content).plain_text(), EXCERPT_CHARS)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_user_list(model: &Model, frame: &mut Frame, area: Rect) {
    let block = list_block(
        format!("Users ({})", model.users.len()),
        model.focus == Focus::List,
    );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if model.users.is_empty() {
        let empty = Paragraph::new("No users yet. Press n to add one.").style(muted_style());
        frame.render_widget(empty, inner);
        return;
    }

    let visible = usize::from(inner.height).max(1);
    let first = first_visible(model.user_selected, visible);
    let lines: Vec<Line> = model
        .users
        .iter()
        .enumerate()
        .skip(first)
        .take(visible)
        .map(|(idx, user)| user_row(user, idx == model.user_selected))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn user_row(user: &User, selected: bool) -> Line<'static> {
    let marker = if selected { ">" } else { " " };
    let name_style = if selected {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::raw(format!("{marker} ")),
        Span::styled(user.name.clone(), name_style),
        Span::styled(format!("  <{}>", user.email), muted_style()),
    ])
}

/// First row index that keeps `selected` inside a window of `visible` rows.
const fn first_visible(selected: usize, visible: usize) -> usize {
    if visible == 0 {
        return selected;
    }
    (selected + 1).saturating_sub(visible)
}

fn form_title(noun: &str, editing: Option<u64>) -> String {
    editing.map_or_else(|| format!("New {noun}"), |id| format!("Edit {noun} #{id}"))
}

fn render_memo_form(model: &mut Model, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(form_title("memo", model.memo_form.editing))
        .borders(Borders::ALL)
        .border_style(border_style(model.focus != Focus::List));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(inner);

    render_field(
        &model.memo_form.title,
        "Title",
        model.focus == Focus::Title,
        frame,
        rows[0],
    );

    if model.memo_form.preview {
        render_preview(model, frame, rows[1]);
    } else {
        render_content_editor(
            &model.memo_form.content,
            model.focus == Focus::Content,
            frame,
            rows[1],
        );
    }
}

fn render_user_form(model: &Model, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(form_title("user", model.user_form.editing))
        .borders(Borders::ALL)
        .border_style(border_style(model.focus != Focus::List));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    render_field(
        &model.user_form.name,
        "Name",
        model.focus == Focus::Name,
        frame,
        rows[0],
    );
    render_field(
        &model.user_form.email,
        "Email",
        model.focus == Focus::Email,
        frame,
        rows[1],
    );
}

/// A bordered single-line input.
fn render_field(buf: &EditorBuffer, label: &str, focused: bool, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(label.to_string())
        .borders(Borders::ALL)
        .border_style(border_style(focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = buf.line_at(0).unwrap_or_default();
    let (_, col) = buf.cursor_line_col();
    let width = usize::from(inner.width).max(1);
    // Keep the caret in view by scrolling long values horizontally.
    let skip = if focused {
        (col + 1).saturating_sub(width)
    } else {
        0
    };
    let spans = editor_line_spans(&text, 0, buf.selection(), focused);
    let line = Line::from(drop_leading_chars(spans, skip));
    frame.render_widget(Paragraph::new(line), inner);
}

fn render_content_editor(buf: &EditorBuffer, focused: bool, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title("Content")
        .borders(Borders::ALL)
        .border_style(border_style(focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let total_lines = buf.line_count();
    let gutter_width = usize::from(line_number_width(total_lines));
    let visible_height = usize::from(inner.height).max(1);
    let (cursor_line, _) = buf.cursor_line_col();
    let start = first_visible(cursor_line, visible_height);
    let end = (start + visible_height).min(total_lines);

    let mut content: Vec<Line> = Vec::new();
    for line_idx in start..end {
        let line_text = buf.line_at(line_idx).unwrap_or_default();
        let line_start = buf.rope().line_to_char(line_idx);
        let line_num = format!("{:>gutter_width$} ", line_idx + 1);

        let mut spans = vec![Span::styled(line_num, gutter_style())];
        spans.extend(editor_line_spans(
            &line_text,
            line_start,
            buf.selection(),
            focused,
        ));
        content.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(content), inner);
}

/// Styled spans for one editor line starting at char offset `line_start`.
///
/// Selected chars get the selection background; the caret is drawn as a
/// reversed cell, past the last char when it sits at the end of the line.
fn editor_line_spans(
    text: &str,
    line_start: usize,
    selection: Selection,
    show_cursor: bool,
) -> Vec<Span<'static>> {
    let cell_style = |offset: usize| {
        if show_cursor && offset == selection.start {
            cursor_style()
        } else if selection.range().contains(&offset) {
            selection_style()
        } else {
            Style::default()
        }
    };

    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();
    let mut len = 0;
    for (idx, ch) in text.chars().enumerate() {
        let style = cell_style(line_start + idx);
        if style != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = style;
        run.push(ch);
        len = idx + 1;
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }
    if show_cursor && selection.start == line_start + len {
        spans.push(Span::styled(" ", cursor_style()));
    }
    spans
}

fn drop_leading_chars(spans: Vec<Span<'static>>, mut skip: usize) -> Vec<Span<'static>> {
    if skip == 0 {
        return spans;
    }
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        let count = span.content.chars().count();
        if skip >= count {
            skip -= count;
            continue;
        }
        let rest: String = span.content.chars().skip(skip).collect();
        skip = 0;
        out.push(Span::styled(rest, span.style));
    }
    out
}

fn render_preview(model: &mut Model, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title("Preview")
        .borders(Borders::ALL)
        .border_style(border_style(model.focus == Focus::Content));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let source = model.memo_form.content.text();
    if source.trim().is_empty() {
        frame.render_widget(
            Paragraph::new("Nothing to preview").style(muted_style()),
            inner,
        );
        return;
    }

    let lines = Document::parse(&source).layout(model.preview_width(inner.width));
    let visible = usize::from(inner.height);
    let max_scroll = lines.len().saturating_sub(visible);
    let form = &mut model.memo_form;
    form.preview_scroll = form.preview_scroll.min(max_scroll);

    let content: Vec<Line> = lines
        .iter()
        .skip(form.preview_scroll)
        .take(visible)
        .map(styled_line)
        .collect();
    frame.render_widget(Paragraph::new(content), inner);
}

fn styled_line(line: &RenderedLine) -> Line<'static> {
    let line_style = style_for_line_type(line.line_type());
    match line.spans() {
        Some(spans) => Line::from(
            spans
                .iter()
                .map(|span| {
                    Span::styled(
                        span.text().to_string(),
                        style_for_inline(line_style, span.style()),
                    )
                })
                .collect::<Vec<_>>(),
        ),
        None => Line::styled(line.content().to_string(), line_style),
    }
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}
