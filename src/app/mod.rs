//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::dispatch`]: Runs a message, its side effects, and any follow-ups
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Focus, MemoForm, Model, PendingDelete, Screen, ToastLevel, UserForm};
pub use update::{Message, update};

use std::collections::VecDeque;

use crate::store::Store;

/// Main application struct that owns the store and runs the event loop.
pub struct App {
    store: Store,
    screen: Screen,
    wrap_width: Option<u16>,
}

impl App {
    /// Create a new application backed by `store`.
    pub fn new(store: Store) -> Self {
        Self {
            store,
            screen: Screen::default(),
            wrap_width: None,
        }
    }

    /// Set the screen shown at startup.
    pub const fn with_screen(mut self, screen: Screen) -> Self {
        self.screen = screen;
        self
    }

    /// Cap the preview wrap width.
    pub const fn with_wrap_width(mut self, wrap_width: Option<u16>) -> Self {
        self.wrap_width = wrap_width;
        self
    }

    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// Build the initial model with records loaded from the store.
    pub fn initial_model(&self, size: (u16, u16)) -> Model {
        let mut model = Model::new(self.screen, size);
        model.wrap_width = self.wrap_width;
        model.set_records(self.store.memos(), self.store.users());
        model
    }

    /// Run `msg` through `update`, apply its side effects, then drain the
    /// follow-up queue the same way.
    ///
    /// Each follow-up runs only after the update that queued it has been
    /// applied, in the order queued.
    pub fn dispatch(&mut self, model: &mut Model, msg: Message) {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let side_msg = msg.clone();
            *model = update(std::mem::take(model), msg);
            self.handle_message_side_effects(model, &side_msg);
            queue.extend(model.deferred.drain(..));
        }
    }
}
