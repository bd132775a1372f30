pub mod error;
pub mod game;
pub mod plain;
pub mod preset;
pub mod target;
pub mod view;

pub use error::{parse_guess, GameError};
pub use game::{score_for, Outcome, RoundEngine, RoundSnapshot, SessionState};
pub use plain::{run_lines, Command, OutputFormat};
pub use preset::{Difficulty, DifficultyPreset};
pub use target::{FixedTarget, RandomTarget, TargetSource};
pub use view::GuessApp;

use crate::core::engine::Engine;
use anyhow::Result;
use tokio::io::BufReader;
use tracing::info;

/// Full-screen game in the current terminal
pub async fn run_tui<S: TargetSource>(engine: RoundEngine<S>) -> Result<()> {
    let app = GuessApp::new(engine);
    let terminal = ratatui::init();

    let result = Engine::new(app).run(terminal).await;

    ratatui::restore();
    let app = result?;
    let session = app.engine().session();
    info!(
        score = session.cumulative_score,
        won = session.rounds_won,
        lost = session.rounds_lost,
        "session finished"
    );
    Ok(())
}

/// Line mode over stdin/stdout
pub async fn run_plain<S: TargetSource>(
    mut engine: RoundEngine<S>,
    format: OutputFormat,
) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    run_lines(&mut engine, stdin, tokio::io::stdout(), format).await
}
