//! Core interface between the terminal engine and a game view
use crossterm::event::KeyEvent;

/// What the engine loop should do after a key was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Main game trait driven by [`Engine`](crate::core::engine::Engine).
/// The game owns its state; the engine only feeds it keys and asks it to draw.
pub trait Game {
    /// Handle one key press.
    fn handle_key(&mut self, key: KeyEvent) -> Flow;

    /// Draw the current state into the Ratatui frame.
    fn render(&self, frame: &mut ratatui::Frame);
}
