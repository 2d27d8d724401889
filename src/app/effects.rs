use tracing::{debug, warn};

use crate::app::{App, Message, Model, Screen, ToastLevel};
use crate::app::model::{Focus, MemoForm, UserForm};
use crate::store::{RecordKind, StoreError};

impl App {
    /// Perform the store work a message asks for.
    ///
    /// Failures never propagate: they land in the model's error banner.
    pub(super) fn handle_message_side_effects(&mut self, model: &mut Model, msg: &Message) {
        match msg {
            Message::Submit => self.submit(model),
            Message::ConfirmDelete => self.confirm_delete(model),
            Message::Reload => {
                self.refresh(model);
                model.show_toast(ToastLevel::Info, "Reloaded");
            }
            _ => {}
        }
    }

    fn submit(&mut self, model: &mut Model) {
        let result = match model.screen {
            Screen::Memos => {
                let draft = model.memo_form.draft();
                let saved = match model.memo_form.editing {
                    Some(id) => self.store.update_memo(id, &draft),
                    None => self.store.create_memo(&draft),
                };
                saved.map(|memo| (memo.id, "Memo saved"))
            }
            Screen::Users => {
                let draft = model.user_form.draft();
                let saved = match model.user_form.editing {
                    Some(id) => self.store.update_user(id, &draft),
                    None => self.store.create_user(&draft),
                };
                saved.map(|user| (user.id, "User saved"))
            }
        };

        match result {
            Ok((id, message)) => {
                debug!(id, screen = ?model.screen, "submitted form");
                match model.screen {
                    Screen::Memos => model.memo_form = MemoForm::default(),
                    Screen::Users => model.user_form = UserForm::default(),
                }
                if model.focus != Focus::List {
                    model.focus = Focus::first_field(model.screen);
                }
                model.error = None;
                self.refresh(model);
                select_record(model, id);
                model.show_toast(ToastLevel::Info, message);
            }
            Err(err) => report(model, "save failed", &err),
        }
    }

    fn confirm_delete(&mut self, model: &mut Model) {
        let Some(pending) = model.pending_delete.take() else {
            return;
        };
        let result = match pending.kind {
            RecordKind::Memo => self.store.delete_memo(pending.id),
            RecordKind::User => self.store.delete_user(pending.id),
        };
        match result {
            Ok(()) => {
                // A deleted record can no longer be saved over.
                if pending.kind == RecordKind::Memo && model.memo_form.editing == Some(pending.id) {
                    model.memo_form = MemoForm::default();
                }
                if pending.kind == RecordKind::User && model.user_form.editing == Some(pending.id) {
                    model.user_form = UserForm::default();
                }
                self.refresh(model);
                model.show_toast(ToastLevel::Info, format!("Deleted \"{}\"", pending.label));
            }
            Err(err) => report(model, "delete failed", &err),
        }
    }

    fn refresh(&self, model: &mut Model) {
        model.set_records(self.store.memos(), self.store.users());
    }
}

fn select_record(model: &mut Model, id: u64) {
    match model.screen {
        Screen::Memos => {
            if let Some(idx) = model.memos.iter().position(|memo| memo.id == id) {
                model.memo_selected = idx;
            }
        }
        Screen::Users => {
            if let Some(idx) = model.users.iter().position(|user| user.id == id) {
                model.user_selected = idx;
            }
        }
    }
}

fn report(model: &mut Model, action: &str, err: &StoreError) {
    match err {
        StoreError::Validation(_) => debug!(%err, "{action}"),
        _ => warn!(%err, "{action}"),
    }
    model.error = Some(err.to_string());
}
