//! Tictac - terminal tic-tac-toe
//!
//! Two humans share the keyboard, or one plays the engine at one of three
//! difficulty tiers.

#![warn(missing_docs)]

mod cli;
mod play;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::path::{Path, PathBuf};
use tictac_engine::{Difficulty, EngineConfig, GameMode, Mark, Session};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            mode,
            difficulty,
            ai_mark,
            delay_ms,
            save,
            log_file,
        } => {
            init_logging(&log_file)?;
            let config = load_config(config, mode, difficulty, ai_mark, delay_ms)?;
            run_play(config, save).await
        }
        Command::Inspect { path } => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
                )
                .with_writer(std::io::stderr)
                .init();
            run_inspect(path).await
        }
    }
}

/// Sends logs to a file so they stay off the board.
fn init_logging(log_file: &Path) -> Result<()> {
    let file = std::fs::File::create(log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tictac_engine=debug")),
        )
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Reads the config file, if any, then applies command-line overrides.
#[instrument]
fn load_config(
    path: Option<PathBuf>,
    mode: Option<GameMode>,
    difficulty: Option<Difficulty>,
    ai_mark: Option<Mark>,
    delay_ms: Option<u64>,
) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => EngineConfig::from_file(&path)?,
        None => EngineConfig::default(),
    };
    if let Some(mode) = mode {
        config = config.with_mode(mode);
    }
    if let Some(difficulty) = difficulty {
        config = config.with_difficulty(difficulty);
    }
    if let Some(ai_mark) = ai_mark {
        config = config.with_ai_mark(ai_mark);
    }
    if let Some(delay_ms) = delay_ms {
        config = config.with_ai_delay_ms(delay_ms);
    }
    Ok(config)
}

/// Run an interactive game
async fn run_play(config: EngineConfig, save: PathBuf) -> Result<()> {
    info!(
        mode = %config.mode(),
        difficulty = %config.difficulty(),
        ai_mark = %config.ai_mark(),
        delay_ms = config.ai_delay_ms(),
        "Starting tictac"
    );
    let session = Session::from_config(&config);
    play::run(session, save).await
}

/// Validate a saved game and print it
async fn run_inspect(path: PathBuf) -> Result<()> {
    let snapshot = play::read_snapshot(&path).await?;
    let state = snapshot.restore()?;
    println!("{}", render::frame(&state, &state.report()));
    println!("{} moves recorded", state.ledger().len());
    Ok(())
}
