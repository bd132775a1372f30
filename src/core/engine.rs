use crate::core::game::{Flow, Game};
use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures_util::StreamExt;
use ratatui::DefaultTerminal;
use std::time::Duration;
use tracing::info;

// Keeps the screen fresh after resizes even when no key arrives.
const REDRAW_EVERY: Duration = Duration::from_millis(250);

pub struct Engine<G: Game> {
    game: G,
}

impl<G: Game> Engine<G> {
    pub fn new(game: G) -> Self {
        Self { game }
    }

    /// Runs until the game asks to quit or the terminal closes its event
    /// stream. Hands the game back so the caller can inspect final state.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<G> {
        let mut events = EventStream::new();
        let mut redraw = tokio::time::interval(REDRAW_EVERY);

        loop {
            terminal
                .draw(|f| self.game.render(f))
                .context("failed to draw frame")?;

            tokio::select! {
                maybe_event = events.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            if self.game.handle_key(key) == Flow::Quit {
                                info!("quit requested");
                                break;
                            }
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => return Err(e).context("failed to read terminal event"),
                        None => break,
                    }
                }

                _ = redraw.tick() => {}
            }
        }

        Ok(self.game)
    }
}
