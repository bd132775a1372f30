use std::path::PathBuf;

use clap::Parser;

use crate::core::logging::LogTarget;
use crate::games::guess::{Difficulty, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "guessterm")]
#[command(about = "🔢 Guess the number in your terminal")]
#[command(version)]
pub struct Cli {
    /// Starting difficulty: easy (1-100, 10 tries), medium (1-500, 8), hard (1-1000, 6)
    #[arg(short, long, default_value = "easy")]
    pub difficulty: Difficulty,

    /// Seed for the number picker, for reproducible games
    #[arg(long)]
    pub seed: Option<u64>,

    /// Read guesses line by line from stdin instead of the full-screen UI
    #[arg(long)]
    pub plain: bool,

    /// Print every response as a JSON line (implies --plain)
    #[arg(long)]
    pub json: bool,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Tui,
    Plain(OutputFormat),
}

impl Cli {
    pub fn mode(&self) -> Mode {
        match (self.plain, self.json) {
            (_, true) => Mode::Plain(OutputFormat::Json),
            (true, false) => Mode::Plain(OutputFormat::Text),
            (false, false) => Mode::Tui,
        }
    }

    /// The full-screen UI owns stdout and stderr, so it only logs to a file.
    pub fn log_target(&self) -> LogTarget {
        match (&self.log_file, self.mode()) {
            (Some(path), _) => LogTarget::File(path.clone()),
            (None, Mode::Tui) => LogTarget::Discard,
            (None, Mode::Plain(_)) => LogTarget::Stderr,
        }
    }
}
