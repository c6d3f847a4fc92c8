//! Hard tier: exhaustive minimax.
//!
//! No pruning and no depth adjustment: a win is worth the same whether it
//! comes now or five plies later. Scores are taken from the perspective of
//! a `maximizer` mark; the opposing mark minimizes.

use crate::board::{Board, Mark, Square};

/// Leaf score for a line completed by the maximizing mark.
pub const WIN_SCORE: i32 = 10;

/// Leaf score for a line completed by the minimizing mark.
pub const LOSS_SCORE: i32 = -10;

/// Best cell for `to_move`, scoring from `maximizer`'s point of view.
///
/// Ties go to the lowest cell index. Returns `None` if the position is
/// already decided or the board is full.
pub fn best_move(board: &Board, to_move: Mark, maximizer: Mark) -> Option<usize> {
    let mut scratch = *board;
    minimax(&mut scratch, to_move, maximizer).cell
}

/// Minimax value of the position with `to_move` on move.
pub fn evaluate(board: &Board, to_move: Mark, maximizer: Mark) -> i32 {
    let mut scratch = *board;
    minimax(&mut scratch, to_move, maximizer).score
}

#[derive(Debug, Clone, Copy)]
struct Scored {
    cell: Option<usize>,
    score: i32,
}

impl Scored {
    fn leaf(score: i32) -> Self {
        Self { cell: None, score }
    }
}

fn minimax(board: &mut Board, to_move: Mark, maximizer: Mark) -> Scored {
    if board.has_line(maximizer.opponent()) {
        return Scored::leaf(LOSS_SCORE);
    }
    if board.has_line(maximizer) {
        return Scored::leaf(WIN_SCORE);
    }
    if board.is_full() {
        return Scored::leaf(0);
    }

    let maximizing = to_move == maximizer;
    let mut best: Option<Scored> = None;

    for cell in 0..board.squares().len() {
        if !board.is_empty(cell) {
            continue;
        }
        board.put(cell, Square::Occupied(to_move));
        let score = minimax(board, to_move.opponent(), maximizer).score;
        board.put(cell, Square::Empty);

        let improves = match best {
            None => true,
            Some(b) if maximizing => score > b.score,
            Some(b) => score < b.score,
        };
        if improves {
            best = Some(Scored {
                cell: Some(cell),
                score,
            });
        }
    }

    best.unwrap_or(Scored::leaf(0))
}
