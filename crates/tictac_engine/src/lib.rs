//! Tic-tac-toe engine: game state machine plus adversarial search.
//!
//! # Architecture
//!
//! - **Board**: 3x3 grid, win and draw predicates
//! - **Ledger**: move history backing undo
//! - **Game**: turn order, legality, outcomes and scores
//! - **Search**: Easy (random), Medium (win/block) and Hard (minimax) tiers
//! - **Snapshot**: JSON save/restore shape with validation
//! - **Session**: delayed AI reply as a cancellable queued task
//!
//! # Example
//!
//! ```
//! use tictac_engine::{Difficulty, GameMode, GameState, Outcome};
//!
//! let mut game = GameState::new(GameMode::VersusAi, Difficulty::Hard);
//! game.apply_human_move(0)?;
//! let report = game.request_ai_move(&mut rand::rng())?;
//! assert_eq!(report.outcome(), &Outcome::InProgress);
//! # Ok::<(), tictac_engine::EngineError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod config;
mod error;
mod game;
mod ledger;
mod search;
mod session;
mod snapshot;

// Crate-level exports - Board
pub use board::{Board, Mark, Square, CELL_COUNT, WINNING_LINES};

// Crate-level exports - Configuration
pub use config::{ConfigError, EngineConfig};

// Crate-level exports - Errors
pub use error::{EngineError, EngineErrorKind, IllegalMoveReason};

// Crate-level exports - State machine
pub use game::{GameMode, GameState, MoveReport, Outcome};
pub use ledger::{Move, MoveLedger};

// Crate-level exports - Search
pub use search::{
    best_move, choose_move, evaluate, heuristic_move, random_move, Difficulty, LOSS_SCORE,
    WIN_SCORE,
};

// Crate-level exports - Scheduling and persistence
pub use session::{PendingAiMove, Session};
pub use snapshot::Snapshot;
