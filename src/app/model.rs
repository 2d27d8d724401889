use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::editor::EditorBuffer;
use crate::store::{Memo, MemoDraft, RecordKind, User, UserDraft};

use super::update::Message;

const TOAST_TTL: Duration = Duration::from_secs(4);

/// Top-level screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Screen {
    #[default]
    Memos,
    Users,
}

impl Screen {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Memos => "Memos",
            Self::Users => "Users",
        }
    }

    /// Value used for `--screen` in flags files.
    pub const fn as_flag(self) -> &'static str {
        match self {
            Self::Memos => "memos",
            Self::Users => "users",
        }
    }

    pub fn from_flag(value: &str) -> Option<Self> {
        match value {
            "memos" => Some(Self::Memos),
            "users" => Some(Self::Users),
            _ => None,
        }
    }
}

/// Which widget receives key input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    List,
    Title,
    Content,
    Name,
    Email,
}

impl Focus {
    /// Focus order on `screen`, starting with the record list.
    pub const fn cycle(screen: Screen) -> &'static [Self] {
        match screen {
            Screen::Memos => &[Self::List, Self::Title, Self::Content],
            Screen::Users => &[Self::List, Self::Name, Self::Email],
        }
    }

    /// The first form field on `screen`.
    pub const fn first_field(screen: Screen) -> Self {
        match screen {
            Screen::Memos => Self::Title,
            Screen::Users => Self::Name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// The memo editor form.
#[derive(Debug, Default)]
pub struct MemoForm {
    /// Id of the memo being edited; `None` creates a new memo
    pub editing: Option<u64>,
    pub title: EditorBuffer,
    pub content: EditorBuffer,
    /// Show the rendered preview instead of the content editor
    pub preview: bool,
    pub preview_scroll: usize,
}

impl MemoForm {
    pub fn load(memo: &Memo) -> Self {
        let mut form = Self {
            editing: Some(memo.id),
            title: EditorBuffer::from_text(&memo.title),
            content: EditorBuffer::from_text(&memo.content),
            ..Self::default()
        };
        form.title.move_to_end();
        form
    }

    pub fn draft(&self) -> MemoDraft {
        MemoDraft::new(self.title.text(), self.content.text())
    }

    pub const fn is_dirty(&self) -> bool {
        self.title.is_dirty() || self.content.is_dirty()
    }
}

#[derive(Debug, Default)]
pub struct UserForm {
    pub editing: Option<u64>,
    pub name: EditorBuffer,
    pub email: EditorBuffer,
}

impl UserForm {
    pub fn load(user: &User) -> Self {
        let mut form = Self {
            editing: Some(user.id),
            name: EditorBuffer::from_text(&user.name),
            email: EditorBuffer::from_text(&user.email),
        };
        form.name.move_to_end();
        form.email.move_to_end();
        form
    }

    pub fn draft(&self) -> UserDraft {
        UserDraft::new(self.name.text(), self.email.text())
    }

    pub const fn is_dirty(&self) -> bool {
        self.name.is_dirty() || self.email.is_dirty()
    }
}

/// A delete waiting for y/n confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub kind: RecordKind,
    pub id: u64,
    /// Title or name shown in the prompt
    pub label: String,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
#[derive(Debug, Default)]
pub struct Model {
    pub screen: Screen,
    pub focus: Focus,
    pub memos: Vec<Memo>,
    pub memo_selected: usize,
    pub memo_form: MemoForm,
    pub users: Vec<User>,
    pub user_selected: usize,
    pub user_form: UserForm,
    /// Dismissible error banner
    pub error: Option<String>,
    pub pending_delete: Option<PendingDelete>,
    /// Follow-up messages, run after the current update is applied
    pub deferred: VecDeque<Message>,
    /// Wrap column cap for the preview
    pub wrap_width: Option<u16>,
    pub size: (u16, u16),
    pub should_quit: bool,
    pub quit_confirmed: bool,
    toast: Option<Toast>,
}

impl Model {
    pub fn new(screen: Screen, size: (u16, u16)) -> Self {
        Self {
            screen,
            size,
            ..Self::default()
        }
    }

    /// Replace the record lists, keeping the list selections in range.
    pub fn set_records(&mut self, memos: Vec<Memo>, users: Vec<User>) {
        self.memos = memos;
        self.users = users;
        self.memo_selected = self.memo_selected.min(self.memos.len().saturating_sub(1));
        self.user_selected = self.user_selected.min(self.users.len().saturating_sub(1));
    }

    pub fn selected_memo(&self) -> Option<&Memo> {
        self.memos.get(self.memo_selected)
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.users.get(self.user_selected)
    }

    /// Number of rows in the list on the current screen.
    pub fn list_len(&self) -> usize {
        match self.screen {
            Screen::Memos => self.memos.len(),
            Screen::Users => self.users.len(),
        }
    }

    /// Editor for the focused form field, if a field has focus.
    pub fn focused_buffer(&self) -> Option<&EditorBuffer> {
        match self.focus {
            Focus::List => None,
            Focus::Title => Some(&self.memo_form.title),
            Focus::Content => Some(&self.memo_form.content),
            Focus::Name => Some(&self.user_form.name),
            Focus::Email => Some(&self.user_form.email),
        }
    }

    pub fn focused_buffer_mut(&mut self) -> Option<&mut EditorBuffer> {
        match self.focus {
            Focus::List => None,
            Focus::Title => Some(&mut self.memo_form.title),
            Focus::Content => Some(&mut self.memo_form.content),
            Focus::Name => Some(&mut self.user_form.name),
            Focus::Email => Some(&mut self.user_form.email),
        }
    }

    pub const fn form_is_dirty(&self) -> bool {
        self.memo_form.is_dirty() || self.user_form.is_dirty()
    }

    /// Whether typed characters go to an editor rather than key bindings.
    pub const fn is_typing(&self) -> bool {
        match self.focus {
            Focus::List => false,
            Focus::Content => !self.memo_form.preview,
            Focus::Title | Focus::Name | Focus::Email => true,
        }
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    /// Width available to the preview, honouring the wrap cap.
    pub fn preview_width(&self, area_width: u16) -> usize {
        let width = match self.wrap_width {
            Some(cap) if cap > 0 => area_width.min(cap),
            _ => area_width,
        };
        usize::from(width.max(1))
    }
}
