use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Focus, Model, Screen};

use super::style::toast_style;

/// Screen tabs across the top row.
pub fn render_header(model: &Model, frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::styled(
        " memopad ",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for (idx, screen) in [Screen::Memos, Screen::Users].into_iter().enumerate() {
        let label = format!(" {}:{} ", idx + 1, screen.title());
        let style = if screen == model.screen {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(label, style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// The dismissible error banner.
pub fn render_error_banner(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(error) = model.error.as_deref() else {
        return;
    };
    let banner = Paragraph::new(format!(" Error: {error}  (Esc to dismiss)"))
        .style(Style::default().bg(Color::Red).fg(Color::White));
    frame.render_widget(banner, area);
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let (mode, position) = match model.focused_buffer() {
        Some(buf) if model.is_typing() => {
            let (line, col) = buf.cursor_line_col();
            ("EDIT", format!("  Ln {}, Col {}", line + 1, col + 1))
        }
        _ if model.focus == Focus::Content => ("PREVIEW", String::new()),
        _ => ("LIST", format!("  {} records", model.list_len())),
    };

    let editing = match model.screen {
        Screen::Memos => model.memo_form.editing,
        Screen::Users => model.user_form.editing,
    };
    let target = editing.map_or_else(|| "new".to_string(), |id| format!("#{id}"));
    let dirty = if model.form_is_dirty() {
        " [modified]"
    } else {
        ""
    };

    let hints = match model.focus {
        Focus::List => "Enter:edit  n:new  d:delete  Tab:form  q:quit",
        Focus::Content => "Ctrl+S:save  Ctrl+P:preview  Tab:indent  Esc:list",
        Focus::Title | Focus::Name | Focus::Email => "Ctrl+S:save  Tab:next field  Esc:list",
    };

    let status = format!(" {mode}  {target}{dirty}{position}  {hints}");
    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = toast_style(level);
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
