use thiserror::Error;

/// Recoverable conditions reported back to the player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Unknown difficulty '{0}'. Choose easy, medium or hard.")]
    InvalidPresetName(String),

    #[error("Please enter a whole number.")]
    NonIntegerGuess(String),

    #[error("This round is over. Start a new game to keep playing.")]
    RoundAlreadyOver,
}

/// Validates raw guess input before it reaches the engine.
pub fn parse_guess(input: &str) -> Result<i64, GameError> {
    let trimmed = input.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| GameError::NonIntegerGuess(trimmed.to_string()))
}
