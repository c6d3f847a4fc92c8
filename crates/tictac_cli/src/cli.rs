//! Command-line interface for tictac.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tictac_engine::{Difficulty, GameMode, Mark};

/// Tictac - tic-tac-toe against a friend or a minimax engine
#[derive(Parser, Debug)]
#[command(name = "tictac")]
#[command(about = "Terminal tic-tac-toe with three AI tiers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play an interactive game on the terminal
    Play {
        /// Path to engine config (TOML). Defaults apply when absent.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Game mode: twoPlayer or ai
        #[arg(short, long)]
        mode: Option<GameMode>,

        /// AI tier: easy, medium or hard
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// Mark the AI plays (X moves first)
        #[arg(long)]
        ai_mark: Option<Mark>,

        /// Pause before the AI replies, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// File used by the save and load commands
        #[arg(long, default_value = "tictac_save.json")]
        save: PathBuf,

        /// Log file (the terminal is used for the board)
        #[arg(long, default_value = "tictac.log")]
        log_file: PathBuf,
    },

    /// Validate a saved game and print its board
    Inspect {
        /// Snapshot file to read
        path: PathBuf,
    },
}
