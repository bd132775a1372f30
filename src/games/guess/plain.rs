//! Line-oriented front end: one command per line in, one response out.
use anyhow::{Context, Result};
use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use super::error::{parse_guess, GameError};
use super::game::{RoundEngine, RoundSnapshot};
use super::preset::Difficulty;
use super::target::TargetSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Guess(i64),
    NewRound,
    Level(String),
    Status,
    Help,
    Quit,
}

impl Command {
    /// `Ok(None)` for blank lines. Anything that isn't a keyword must be a
    /// whole number.
    pub fn parse(line: &str) -> Result<Option<Self>, GameError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let mut words = line.split_whitespace();
        let head = words.next().unwrap_or_default().to_ascii_lowercase();
        let cmd = match head.as_str() {
            "quit" | "exit" | "q" => Command::Quit,
            "new" => Command::NewRound,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "level" | "difficulty" => Command::Level(words.collect::<Vec<_>>().join(" ")),
            name if name.parse::<Difficulty>().is_ok() => Command::Level(head.clone()),
            _ => Command::Guess(parse_guess(line)?),
        };
        Ok(Some(cmd))
    }
}

const HELP: &str = "Commands: <number> to guess, new, easy|medium|hard, status, quit";

struct Output<W> {
    writer: W,
    format: OutputFormat,
}

impl<W: AsyncWrite + Unpin> Output<W> {
    async fn line(&mut self, text: &str) -> Result<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await.context("failed to flush output")
    }

    async fn banner(&mut self, s: &RoundSnapshot) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.snapshot(s).await,
            OutputFormat::Text => {
                self.line(&format!(
                    "[{}] I'm thinking of a number between 1 and {}. You have {} attempts.",
                    s.difficulty.label(),
                    s.max_value,
                    s.max_attempts
                ))
                .await
            }
        }
    }

    async fn snapshot(&mut self, s: &RoundSnapshot) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                let encoded = serde_json::to_string(s)?;
                self.line(&encoded).await
            }
            OutputFormat::Text => {
                if !s.message.is_empty() {
                    self.line(&s.message).await?;
                }
                self.line(&format!(
                    "Attempts left: {} | Score: {}",
                    s.attempts_remaining, s.cumulative_score
                ))
                .await?;
                if s.is_over {
                    self.line("Type 'new' for another round or a difficulty name to switch.")
                        .await?;
                }
                Ok(())
            }
        }
    }

    async fn error(&mut self, e: &GameError) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.line(&json!({ "error": e.to_string() }).to_string()).await,
            OutputFormat::Text => self.line(&format!("error: {e}")).await,
        }
    }

    async fn help(&mut self) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.line(&json!({ "help": HELP }).to_string()).await,
            OutputFormat::Text => self.line(HELP).await,
        }
    }
}

/// Plays rounds from `reader` until `quit` or end of input.
pub async fn run_lines<S, R, W>(
    engine: &mut RoundEngine<S>,
    reader: R,
    writer: W,
    format: OutputFormat,
) -> Result<()>
where
    S: TargetSource,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut out = Output { writer, format };
    let mut lines = reader.lines();

    out.banner(&engine.snapshot()).await?;

    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        let cmd = match Command::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                warn!(input = %line.trim(), error = %e, "rejected input");
                out.error(&e).await?;
                continue;
            }
        };

        match cmd {
            Command::Quit => break,
            Command::Help => out.help().await?,
            Command::Status => out.snapshot(&engine.snapshot()).await?,
            Command::NewRound => {
                let s = engine.start_round(None);
                out.banner(&s).await?;
            }
            Command::Level(name) => match engine.change_difficulty_named(&name) {
                Ok(s) => out.banner(&s).await?,
                Err(e) => {
                    warn!(name = %name, "unknown difficulty");
                    out.error(&e).await?;
                }
            },
            Command::Guess(value) => match engine.submit_guess(value) {
                Ok(s) => out.snapshot(&s).await?,
                Err(e) => out.error(&e).await?,
            },
        }
    }

    let session = engine.session();
    info!(
        score = session.cumulative_score,
        won = session.rounds_won,
        lost = session.rounds_lost,
        "session finished"
    );
    Ok(())
}
