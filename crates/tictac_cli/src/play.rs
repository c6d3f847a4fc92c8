//! Interactive game loop.
//!
//! Waits on either the next stdin line or the queued AI deadline, whichever
//! comes first, so the AI's pause never blocks input handling.

use crate::render;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tictac_engine::{Difficulty, GameMode, MoveReport, Session, Snapshot};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument, warn};

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Place a mark.
    Cell(usize),
    /// Take back the last move.
    Undo,
    /// Queue the AI if it holds the move.
    Ai,
    /// New game, same settings.
    Restart,
    /// New game in another mode.
    Mode(GameMode),
    /// Change the AI tier.
    Difficulty(Difficulty),
    /// Print the score.
    Scores,
    /// Zero the score.
    ResetScores,
    /// Save to the given or default path.
    Save(Option<PathBuf>),
    /// Load from the given or default path.
    Load(Option<PathBuf>),
    /// Print the command list.
    Help,
    /// Leave the game.
    Quit,
}

impl FromStr for Input {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let head = words.next().ok_or_else(|| "empty command".to_string())?;
        let arg = words.next();
        if let Ok(cell) = head.parse::<usize>() {
            return Ok(Input::Cell(cell));
        }
        match (head.to_ascii_lowercase().as_str(), arg) {
            ("undo" | "u", _) => Ok(Input::Undo),
            ("ai", _) => Ok(Input::Ai),
            ("restart" | "r", _) => Ok(Input::Restart),
            ("mode", Some(m)) => m
                .parse()
                .map(Input::Mode)
                .map_err(|_| format!("unknown mode {:?}", m)),
            ("difficulty" | "d", Some(d)) => d
                .parse()
                .map(Input::Difficulty)
                .map_err(|_| format!("unknown difficulty {:?}", d)),
            ("scores", _) => Ok(Input::Scores),
            ("reset", _) => Ok(Input::ResetScores),
            ("save", path) => Ok(Input::Save(path.map(PathBuf::from))),
            ("load", path) => Ok(Input::Load(path.map(PathBuf::from))),
            ("help" | "?", _) => Ok(Input::Help),
            ("quit" | "q" | "exit", _) => Ok(Input::Quit),
            (other, _) => Err(format!("unknown command {:?} (try help)", other)),
        }
    }
}

/// Runs the game until the user quits or stdin closes.
#[instrument(skip(session))]
pub async fn run(mut session: Session, save_path: PathBuf) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    session.resume(std::time::Instant::now());
    println!("{}", render::HELP);
    println!("{}", render::frame(session.state(), &session.state().report()));

    loop {
        let deadline = session.next_deadline();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    info!("Stdin closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Input>() {
                    Ok(Input::Quit) => break,
                    Ok(input) => handle(&mut session, input, &save_path).await,
                    Err(msg) => println!("{}", msg),
                }
            }
            _ = wait_for(deadline) => {
                if let Some(result) = session.poll(std::time::Instant::now()) {
                    match result {
                        Ok(report) => println!("{}", render::frame(session.state(), &report)),
                        Err(e) => println!("AI move failed: {}", e),
                    }
                }
            }
        }
    }

    info!(
        score_x = session.state().score_x(),
        score_o = session.state().score_o(),
        "Session ended"
    );
    Ok(())
}

async fn wait_for(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(due) => tokio::time::sleep_until(tokio::time::Instant::from_std(due)).await,
        None => std::future::pending::<()>().await,
    }
}

async fn handle(session: &mut Session, input: Input, save_path: &Path) {
    let now = std::time::Instant::now();
    debug!(?input, "Handling input");
    let shown: Result<MoveReport> = match input {
        Input::Cell(cell) => session.human_move(cell, now).map_err(Into::into),
        Input::Undo => session.undo().map_err(Into::into),
        Input::Ai => {
            if !session.resume(now) {
                println!("The AI does not hold the move");
            }
            Ok(session.state().report())
        }
        Input::Restart => Ok(session.restart(now)),
        Input::Mode(mode) => {
            let difficulty = session.state().difficulty();
            Ok(session.start_game(mode, difficulty, now))
        }
        Input::Difficulty(difficulty) => {
            session.set_difficulty(difficulty);
            Ok(session.state().report())
        }
        Input::Scores => Ok(session.state().report()),
        Input::ResetScores => {
            session.reset_scores();
            Ok(session.state().report())
        }
        Input::Save(path) => {
            let path = path.unwrap_or_else(|| save_path.to_path_buf());
            match save(session, &path).await {
                Ok(()) => println!("Saved to {}", path.display()),
                Err(e) => println!("Save failed: {:#}", e),
            }
            return;
        }
        Input::Load(path) => {
            let path = path.unwrap_or_else(|| save_path.to_path_buf());
            load(session, &path, now).await
        }
        Input::Help => {
            println!("{}", render::HELP);
            return;
        }
        Input::Quit => return,
    };

    match shown {
        Ok(report) => println!("{}", render::frame(session.state(), &report)),
        Err(e) => {
            warn!(error = %e, "Command rejected");
            println!("{}", e);
        }
    }
}

/// Writes the current game to `path` as JSON.
#[instrument(skip(session))]
pub async fn save(session: &Session, path: &Path) -> Result<()> {
    let json = session.capture().to_json()?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Game saved");
    Ok(())
}

/// Reads a snapshot file.
#[instrument]
pub async fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Snapshot::from_json(&json)?)
}

async fn load(session: &mut Session, path: &Path, now: std::time::Instant) -> Result<MoveReport> {
    let snapshot = read_snapshot(path).await?;
    let report = session.restore(snapshot, now)?;
    info!(path = %path.display(), "Game loaded");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;
    use tictac_engine::{GameState, Mark};

    #[test]
    fn test_parse_commands() {
        assert_eq!("4".parse::<Input>(), Ok(Input::Cell(4)));
        assert_eq!("  UNDO ".parse::<Input>(), Ok(Input::Undo));
        assert_eq!("mode ai".parse::<Input>(), Ok(Input::Mode(GameMode::VersusAi)));
        assert_eq!(
            "mode twoPlayer".parse::<Input>(),
            Ok(Input::Mode(GameMode::TwoPlayer))
        );
        assert_eq!(
            "difficulty Medium".parse::<Input>(),
            Ok(Input::Difficulty(Difficulty::Medium))
        );
        assert_eq!("save".parse::<Input>(), Ok(Input::Save(None)));
        assert_eq!(
            "load game.json".parse::<Input>(),
            Ok(Input::Load(Some(PathBuf::from("game.json"))))
        );
        assert!("mode".parse::<Input>().is_err());
        assert!("fly".parse::<Input>().is_err());
    }

    #[test]
    fn test_out_of_range_cell_reaches_engine() {
        // Range checks belong to the engine, not the parser.
        assert_eq!("12".parse::<Input>(), Ok(Input::Cell(12)));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        let mut session = Session::with_rng(
            GameState::default(),
            StdRng::seed_from_u64(1),
            Duration::ZERO,
        );
        let now = std::time::Instant::now();
        session.human_move(4, now).unwrap();
        save(&session, &path).await.unwrap();

        let mut other = Session::with_rng(
            GameState::default(),
            StdRng::seed_from_u64(2),
            Duration::ZERO,
        );
        load(&mut other, &path, now).await.unwrap();
        assert_eq!(other.state(), session.state());
        assert_eq!(other.state().current_player(), Mark::O);
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::with_rng(
            GameState::default(),
            StdRng::seed_from_u64(1),
            Duration::ZERO,
        );
        let err = load(&mut session, &dir.path().join("nope.json"), std::time::Instant::now())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
