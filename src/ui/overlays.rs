use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::app::Model;

const CONFIRM_WIDTH: u16 = 48;
const CONFIRM_HEIGHT: u16 = 7;

/// The y/n prompt shown while a delete waits for confirmation.
pub fn render_delete_confirm(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(pending) = model.pending_delete.as_ref() else {
        return;
    };
    let popup = centered_popup_rect(CONFIRM_WIDTH, CONFIRM_HEIGHT, area);

    let lines = vec![
        Line::from(vec![
            Span::raw(format!("Delete {} ", pending.kind)),
            Span::styled(
                format!("\"{}\"", pending.label),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("?"),
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::styled(
                "y",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" delete  "),
            Span::styled(
                "n",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("/Esc cancel"),
        ]),
    ];

    let block = Block::default()
        .title("Confirm")
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        popup,
    );
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
