pub mod cli;

pub mod core {
	pub mod engine;
	pub mod game;
	pub mod logging;
}

pub mod games;

// Re-export for convenience
pub use crate::core::game::{Flow, Game};
pub use crate::games::guess::{Difficulty, RoundEngine, RoundSnapshot};
