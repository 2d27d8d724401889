use crate::app::Model;
use crate::app::model::{Focus, MemoForm, PendingDelete, Screen, ToastLevel, UserForm};
use crate::editor::{Direction, EditorBuffer, Selection, engine};
use crate::store::RecordKind;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Navigation
    /// Switch to a screen
    ShowScreen(Screen),
    /// Move focus to the next widget
    FocusNext,
    /// Move focus to the previous widget
    FocusPrev,
    /// Leave the focused field for the list
    Blur,

    // List
    SelectPrev,
    SelectNext,
    /// Load the selected record into the form
    EditSelected,
    /// Ask to delete the selected record
    RequestDelete,
    ConfirmDelete,
    CancelDelete,

    // Editing (applies to the focused field)
    InsertChar(char),
    /// Enter
    InsertNewline,
    /// Backspace
    DeleteBack,
    /// Delete
    DeleteForward,
    /// Bracketed paste, inserted verbatim
    Paste(String),
    MoveCursor(Direction),
    ExtendSelection(Direction),
    MoveHome,
    MoveEnd,
    MoveToStart,
    MoveToEnd,
    /// Tab inside the content editor
    Indent,
    /// Shift+Tab inside the content editor
    Outdent,
    /// Put the content editor selection back after an edit is visible
    RestoreSelection(Selection),

    // Preview
    TogglePreview,
    PreviewScrollUp(usize),
    PreviewScrollDown(usize),

    // Form
    /// Clear the form for a new record
    ResetForm,
    /// Create or update the record in the form
    Submit,
    /// Re-read records from the store
    Reload,
    DismissError,

    // Window
    /// Terminal resized
    Resize(u16, u16),

    // Application
    /// Quit the application
    Quit,
}

impl Message {
    /// Messages that change the content buffer's text.
    const fn edits_text(&self) -> bool {
        matches!(
            self,
            Self::InsertChar(_)
                | Self::InsertNewline
                | Self::Paste(_)
                | Self::DeleteBack
                | Self::DeleteForward
        )
    }
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// Store access happens afterwards in the side-effect handler.
pub fn update(mut model: Model, msg: Message) -> Model {
    if !matches!(msg, Message::Quit) {
        model.quit_confirmed = false;
    }

    if model.focus == Focus::Content && !model.memo_form.preview && msg.edits_text() {
        edit_content(&mut model, &msg);
        return model;
    }

    match msg {
        // Navigation
        Message::ShowScreen(screen) => {
            if model.screen != screen {
                model.screen = screen;
                model.focus = Focus::List;
                model.pending_delete = None;
            }
        }
        Message::FocusNext => cycle_focus(&mut model, 1),
        Message::FocusPrev => cycle_focus(&mut model, -1),
        Message::Blur => model.focus = Focus::List,

        // List
        Message::SelectPrev => {
            let selected = selected_index_mut(&mut model);
            *selected = selected.saturating_sub(1);
        }
        Message::SelectNext => {
            let last = model.list_len().saturating_sub(1);
            let selected = selected_index_mut(&mut model);
            *selected = (*selected + 1).min(last);
        }
        Message::EditSelected => match model.screen {
            Screen::Memos => {
                if let Some(memo) = model.selected_memo() {
                    model.memo_form = MemoForm::load(memo);
                    model.focus = Focus::Title;
                }
            }
            Screen::Users => {
                if let Some(user) = model.selected_user() {
                    model.user_form = UserForm::load(user);
                    model.focus = Focus::Name;
                }
            }
        },
        Message::RequestDelete => {
            model.pending_delete = match model.screen {
                Screen::Memos => model.selected_memo().map(|memo| PendingDelete {
                    kind: RecordKind::Memo,
                    id: memo.id,
                    label: memo.title.clone(),
                }),
                Screen::Users => model.selected_user().map(|user| PendingDelete {
                    kind: RecordKind::User,
                    id: user.id,
                    label: user.name.clone(),
                }),
            };
        }
        // The store call happens in the side-effect handler, which still
        // needs the pending record; it clears it afterwards.
        Message::ConfirmDelete => {}
        Message::CancelDelete => model.pending_delete = None,

        // Editing
        Message::InsertChar(ch) => with_buffer(&mut model, |buf| buf.insert_char(ch)),
        Message::InsertNewline => match model.focus {
            Focus::Title => model.focus = Focus::Content,
            Focus::Name => model.focus = Focus::Email,
            _ => {}
        },
        Message::DeleteBack => with_buffer(&mut model, |buf| {
            buf.delete_back();
        }),
        Message::DeleteForward => with_buffer(&mut model, |buf| {
            buf.delete_forward();
        }),
        Message::Paste(text) => {
            // Title, name and email are single-line fields.
            let line = text.replace("\r\n", " ").replace(['\r', '\n'], " ");
            with_buffer(&mut model, |buf| buf.insert_str(&line));
        }
        Message::MoveCursor(dir) => with_buffer(&mut model, |buf| buf.move_cursor(dir)),
        Message::ExtendSelection(dir) => {
            with_buffer(&mut model, |buf| buf.extend_selection(dir));
        }
        Message::MoveHome => with_buffer(&mut model, EditorBuffer::move_home),
        Message::MoveEnd => with_buffer(&mut model, EditorBuffer::move_end),
        Message::MoveToStart => with_buffer(&mut model, EditorBuffer::move_to_start),
        Message::MoveToEnd => with_buffer(&mut model, EditorBuffer::move_to_end),
        Message::Indent | Message::Outdent => {
            if model.focus == Focus::Content && !model.memo_form.preview {
                let buf = &mut model.memo_form.content;
                let edit = if msg == Message::Indent {
                    engine::indent(buf.rope(), buf.selection())
                } else {
                    engine::outdent(buf.rope(), buf.selection())
                };
                if let Some(change) = &edit.change {
                    buf.apply(change);
                }
                model
                    .deferred
                    .push_back(Message::RestoreSelection(edit.selection));
            }
        }
        Message::RestoreSelection(selection) => {
            model.memo_form.content.set_selection(selection);
        }

        // Preview
        Message::TogglePreview => {
            if model.screen == Screen::Memos {
                model.memo_form.preview = !model.memo_form.preview;
                model.memo_form.preview_scroll = 0;
            }
        }
        Message::PreviewScrollUp(n) => {
            let form = &mut model.memo_form;
            form.preview_scroll = form.preview_scroll.saturating_sub(n);
        }
        Message::PreviewScrollDown(n) => {
            // Clamped against the laid-out height when drawn.
            let form = &mut model.memo_form;
            form.preview_scroll = form.preview_scroll.saturating_add(n);
        }

        // Form
        Message::ResetForm => {
            match model.screen {
                Screen::Memos => model.memo_form = MemoForm::default(),
                Screen::Users => model.user_form = UserForm::default(),
            }
            model.error = None;
            model.focus = Focus::first_field(model.screen);
        }
        Message::Submit | Message::Reload => {}
        Message::DismissError => model.error = None,

        // Window
        Message::Resize(width, height) => model.size = (width, height),

        // Application
        Message::Quit => {
            if model.form_is_dirty() && !model.quit_confirmed {
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved changes! Press q again to quit, or Ctrl+S to save",
                );
                model.quit_confirmed = true;
            } else {
                model.should_quit = true;
            }
        }
    }
    model
}

/// Apply a raw keystroke to the content editor, then let the editing
/// engine react to it.
///
/// The engine's change is applied immediately; the caret it computed is
/// queued as exactly one [`Message::RestoreSelection`], so it lands only
/// after this update is visible.
fn edit_content(model: &mut Model, msg: &Message) {
    let buf = &mut model.memo_form.content;
    // Pasted text is taken as is; only typed text can continue a list.
    let inserted = matches!(msg, Message::InsertChar(_) | Message::InsertNewline);
    match msg {
        Message::InsertChar(ch) => buf.insert_char(*ch),
        Message::InsertNewline => buf.split_line(),
        Message::Paste(text) => buf.insert_str(text),
        Message::DeleteBack => {
            buf.delete_back();
        }
        Message::DeleteForward => {
            buf.delete_forward();
        }
        _ => return,
    }

    let edit = engine::handle_text_change(buf.rope(), buf.cursor(), inserted);
    if let Some(change) = &edit.change {
        buf.apply(change);
    }
    model
        .deferred
        .push_back(Message::RestoreSelection(edit.selection));
}

fn with_buffer(model: &mut Model, f: impl FnOnce(&mut EditorBuffer)) {
    if model.focus == Focus::Content && model.memo_form.preview {
        return;
    }
    if let Some(buf) = model.focused_buffer_mut() {
        f(buf);
    }
}

fn selected_index_mut(model: &mut Model) -> &mut usize {
    match model.screen {
        Screen::Memos => &mut model.memo_selected,
        Screen::Users => &mut model.user_selected,
    }
}

fn cycle_focus(model: &mut Model, step: isize) {
    let order = Focus::cycle(model.screen);
    let current = order.iter().position(|f| *f == model.focus).unwrap_or(0);
    let next = current
        .checked_add_signed(step)
        .unwrap_or(order.len() - 1)
        % order.len();
    model.focus = order[next];
}
