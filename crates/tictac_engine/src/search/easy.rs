//! Easy tier: no lookahead.

use crate::board::Board;
use rand::Rng;
use rand::seq::IndexedRandom;

/// Chooses uniformly among the empty cells.
pub fn random_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<usize> {
    let empties: Vec<usize> = board.empty_cells().collect();
    empties.choose(rng).copied()
}
