use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Focus, Message, Model, Screen};
use crate::editor::Direction;

/// Lines moved by PageUp/PageDown in the preview.
const PREVIEW_PAGE: usize = 10;

impl App {
    pub(super) fn handle_event(event: &Event, model: &Model) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Resize(w, h) => Some(Message::Resize(*w, *h)),
            Event::Paste(text) if model.pending_delete.is_none() => {
                Some(Message::Paste(text.clone()))
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        // A pending delete swallows everything but the answer.
        if model.pending_delete.is_some() {
            return match key.code {
                KeyCode::Char('y' | 'Y') => Some(Message::ConfirmDelete),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Message::CancelDelete),
                _ => None,
            };
        }

        // Global bindings
        match key.code {
            KeyCode::Char('c') if ctrl => return Some(Message::Quit),
            KeyCode::Char('s') if ctrl => return Some(Message::Submit),
            KeyCode::Char('n') if ctrl => return Some(Message::ResetForm),
            KeyCode::Char('p') if ctrl => return Some(Message::TogglePreview),
            KeyCode::Char('r') if ctrl => return Some(Message::Reload),
            KeyCode::F(1) => return Some(Message::ShowScreen(Screen::Memos)),
            KeyCode::F(2) => return Some(Message::ShowScreen(Screen::Users)),
            KeyCode::Esc if model.error.is_some() => return Some(Message::DismissError),
            KeyCode::Esc if model.focus != Focus::List => return Some(Message::Blur),
            _ => {}
        }

        match model.focus {
            Focus::List => Self::handle_list_key(key),
            Focus::Content if model.memo_form.preview => Self::handle_preview_key(key),
            Focus::Content => Self::handle_editor_key(key, shift, true),
            Focus::Title | Focus::Name | Focus::Email => Self::handle_editor_key(key, shift, false),
        }
    }

    fn handle_list_key(key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Up | KeyCode::Char('k') => Some(Message::SelectPrev),
            KeyCode::Down | KeyCode::Char('j') => Some(Message::SelectNext),
            KeyCode::Enter | KeyCode::Char('e') => Some(Message::EditSelected),
            KeyCode::Char('d') | KeyCode::Delete => Some(Message::RequestDelete),
            KeyCode::Char('n') => Some(Message::ResetForm),
            KeyCode::Char('1') => Some(Message::ShowScreen(Screen::Memos)),
            KeyCode::Char('2') => Some(Message::ShowScreen(Screen::Users)),
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                Some(Message::FocusPrev)
            }
            KeyCode::Tab => Some(Message::FocusNext),
            KeyCode::BackTab => Some(Message::FocusPrev),
            _ => None,
        }
    }

    fn handle_preview_key(key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Message::PreviewScrollUp(1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Message::PreviewScrollDown(1)),
            KeyCode::PageUp => Some(Message::PreviewScrollUp(PREVIEW_PAGE)),
            KeyCode::PageDown | KeyCode::Char(' ') => Some(Message::PreviewScrollDown(PREVIEW_PAGE)),
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                Some(Message::FocusPrev)
            }
            KeyCode::Tab => Some(Message::FocusNext),
            KeyCode::BackTab => Some(Message::FocusPrev),
            _ => None,
        }
    }

    /// Keys for a text field. `content` selects the multi-line content
    /// editor, where Tab/Shift+Tab indent instead of moving focus.
    fn handle_editor_key(key: KeyEvent, shift: bool, content: bool) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            // Some terminals report Shift+Tab as Tab with SHIFT set.
            KeyCode::Tab if shift && content => Some(Message::Outdent),
            KeyCode::Tab if shift => Some(Message::FocusPrev),
            KeyCode::Tab if content => Some(Message::Indent),
            KeyCode::BackTab if content => Some(Message::Outdent),
            KeyCode::Tab => Some(Message::FocusNext),
            KeyCode::BackTab => Some(Message::FocusPrev),
            KeyCode::Enter => Some(Message::InsertNewline),
            KeyCode::Backspace => Some(Message::DeleteBack),
            KeyCode::Delete => Some(Message::DeleteForward),
            KeyCode::Left if shift => Some(Message::ExtendSelection(Direction::Left)),
            KeyCode::Right if shift => Some(Message::ExtendSelection(Direction::Right)),
            KeyCode::Left => Some(Message::MoveCursor(Direction::Left)),
            KeyCode::Right => Some(Message::MoveCursor(Direction::Right)),
            KeyCode::Up => Some(Message::MoveCursor(Direction::Up)),
            KeyCode::Down => Some(Message::MoveCursor(Direction::Down)),
            KeyCode::Home if ctrl => Some(Message::MoveToStart),
            KeyCode::End if ctrl => Some(Message::MoveToEnd),
            KeyCode::Home => Some(Message::MoveHome),
            KeyCode::End => Some(Message::MoveEnd),
            KeyCode::Char(ch) if !ctrl => Some(Message::InsertChar(ch)),
            _ => None,
        }
    }
}
