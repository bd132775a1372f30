use anyhow::Result;
use clap::Parser;
use guessterm::cli::{Cli, Mode};
use guessterm::core::logging;
use guessterm::games::guess::{self, RoundEngine};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_target())?;

    info!(difficulty = %cli.difficulty, seed = ?cli.seed, mode = ?cli.mode(), "starting");
    let engine = RoundEngine::with_seed(cli.difficulty, cli.seed);

    match cli.mode() {
        Mode::Tui => guess::run_tui(engine).await,
        Mode::Plain(format) => guess::run_plain(engine, format).await,
    }
}
