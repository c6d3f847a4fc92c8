//! AI move selection at three difficulty tiers.
//!
//! - Easy: a uniformly random empty cell
//! - Medium: one-ply win/block heuristic
//! - Hard: exhaustive minimax over the remaining game tree

mod easy;
mod hard;
mod medium;

pub use easy::random_move;
pub use hard::{best_move, evaluate, LOSS_SCORE, WIN_SCORE};
pub use medium::heuristic_move;

use crate::board::{Board, Mark};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// AI strength.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Random empty cell.
    Easy,
    /// Take a win, else block, else the first free cell.
    Medium,
    /// Full minimax.
    #[default]
    Hard,
}

/// Picks a cell for `to_move` at the given tier.
///
/// Returns `None` only when the board has no empty cell. The Hard tier
/// maximizes for `to_move`, so it plays correctly for either mark.
#[instrument(skip(board, rng), fields(empty = board.empty_cells().count()))]
pub fn choose_move<R: Rng + ?Sized>(
    board: &Board,
    to_move: Mark,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<usize> {
    let choice = match difficulty {
        Difficulty::Easy => random_move(board, rng),
        Difficulty::Medium => heuristic_move(board, to_move),
        Difficulty::Hard => best_move(board, to_move, to_move),
    };
    debug!(?choice, "AI chose cell");
    choice
}
