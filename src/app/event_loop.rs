use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tracing::{debug, info};

use crate::app::{App, Message, Model};

/// How long to wait for input when nothing needs redrawing.
const IDLE_POLL: Duration = Duration::from_millis(250);

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or the event loop hits
    /// an I/O failure. Store failures are shown in the UI instead.
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; memopad requires an interactive terminal")?;
        if let Err(err) = execute!(stdout(), EnableBracketedPaste) {
            ratatui::restore();
            return Err(err).context("Failed to enable bracketed paste");
        }
        let size = terminal.size()?;
        info!(width = size.width, height = size.height, "starting UI");

        let mut model = self.initial_model((size.width, size.height));
        let result = self.event_loop(&mut terminal, &mut model);

        let _ = execute!(stdout(), DisableBracketedPaste);
        ratatui::restore();
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            if needs_render {
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }

            if event::poll(IDLE_POLL)? {
                self.handle_terminal_event(&event::read()?, model, &mut needs_render);

                // Coalesce key repeat bursts into a single render.
                while event::poll(Duration::ZERO)? {
                    self.handle_terminal_event(&event::read()?, model, &mut needs_render);
                }
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }

    fn handle_terminal_event(
        &mut self,
        event: &event::Event,
        model: &mut Model,
        needs_render: &mut bool,
    ) {
        if let Some(msg) = Self::handle_event(event, model) {
            match &msg {
                Message::InsertChar(_) => {}
                Message::Paste(text) => debug!(chars = text.chars().count(), "paste"),
                _ => debug!(?msg, "message"),
            }
            self.dispatch(model, msg);
            *needs_render = true;
        }
    }
}
