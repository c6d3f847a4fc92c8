//! Medium tier: one-ply heuristic.
//!
//! Takes an immediate win, otherwise blocks the opponent's immediate win,
//! otherwise falls back to the lowest free cell. Forks are not seen.

use crate::board::{Board, Mark};

/// Picks a cell for `to_move` with the win/block/first-free rule.
pub fn heuristic_move(board: &Board, to_move: Mark) -> Option<usize> {
    let empties: Vec<usize> = board.empty_cells().collect();
    let finds = |mark: Mark| empties.iter().copied().find(|&i| board.would_win(i, mark));

    finds(to_move)
        .or_else(|| finds(to_move.opponent()))
        .or_else(|| empties.first().copied())
}
