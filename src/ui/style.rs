//! Theming and color definitions.
//!
//! Styles for rendered markdown lines and for the app chrome. Uses ANSI
//! colors so the terminal's own palette decides the exact shades.

use ratatui::style::{Color, Modifier, Style};

use crate::app::ToastLevel;
use crate::document::{InlineStyle, LineType};

/// Get the style for a given line type.
pub fn style_for_line_type(line_type: &LineType) -> Style {
    match line_type {
        // Headings - bold with distinct colors per level
        LineType::Heading(1) => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineType::Heading(2) => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        LineType::Heading(_) => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),

        LineType::CodeBlock => Style::default()
            .fg(Color::Indexed(245))
            .add_modifier(Modifier::DIM),

        LineType::BlockQuote => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::ITALIC),

        LineType::HorizontalRule => Style::default()
            .fg(Color::Indexed(240))
            .add_modifier(Modifier::DIM),

        LineType::ListItem(_) | LineType::Table | LineType::Paragraph | LineType::Empty => {
            Style::default()
        }
    }
}

/// Get the style for an inline span, merged with a base line style.
pub fn style_for_inline(base: Style, inline: InlineStyle) -> Style {
    let mut style = base;

    if inline.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if inline.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if inline.link {
        style = style
            .fg(Color::LightBlue)
            .add_modifier(Modifier::UNDERLINED);
    }
    if inline.code {
        style = style
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD)
            .remove_modifier(Modifier::DIM);
    }

    style
}

/// Border style for a panel, highlighted when it has focus.
pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Indexed(240))
    }
}

pub fn toast_style(level: ToastLevel) -> (&'static str, Style) {
    match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    }
}

pub fn gutter_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn cursor_style() -> Style {
    Style::default().bg(Color::White).fg(Color::Black)
}

pub fn selection_style() -> Style {
    Style::default().bg(Color::DarkGray)
}

/// Muted text, such as card excerpts and timestamps.
pub fn muted_style() -> Style {
    Style::default().fg(Color::Indexed(245))
}
