//! Board, marks and win detection for tic-tac-toe.

use crate::error::{EngineError, IllegalMoveReason};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// The eight index triples that complete a line.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8], // Rows
    [0, 3, 6], [1, 4, 7], [2, 5, 8], // Columns
    [0, 4, 8], [2, 4, 6],             // Diagonals
];

/// Player symbol.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Mark {
    /// Mark X (moves first).
    X,
    /// Mark O.
    O,
}

impl Mark {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A cell on the board.
///
/// Serialized as `""`, `"X"` or `"O"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Square {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell holding a mark.
    Occupied(Mark),
}

impl Square {
    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Square::Empty => None,
            Square::Occupied(mark) => Some(mark),
        }
    }
}

impl From<Square> for String {
    fn from(square: Square) -> Self {
        match square {
            Square::Empty => String::new(),
            Square::Occupied(mark) => mark.to_string(),
        }
    }
}

impl TryFrom<String> for Square {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "" => Ok(Square::Empty),
            "X" => Ok(Square::Occupied(Mark::X)),
            "O" => Ok(Square::Occupied(Mark::O)),
            other => Err(format!("invalid cell value {:?}", other)),
        }
    }
}

/// 3x3 board stored row-major (0-8).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Square; CELL_COUNT],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a board from raw squares without checking reachability.
    pub fn from_squares(squares: [Square; CELL_COUNT]) -> Self {
        Self { squares }
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square; CELL_COUNT] {
        &self.squares
    }

    /// Gets the square at `index`, or `None` off the board.
    pub fn get(&self, index: usize) -> Option<Square> {
        self.squares.get(index).copied()
    }

    /// True if `index` is on the board and empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Square::Empty))
    }

    /// Places `mark` at `index`.
    ///
    /// # Errors
    ///
    /// `IllegalMove` if the index is off the board or the cell is taken.
    #[instrument(level = "trace", skip(self))]
    pub fn apply(&mut self, index: usize, mark: Mark) -> Result<(), EngineError> {
        match self.get(index) {
            None => Err(EngineError::illegal(IllegalMoveReason::OutOfRange(index))),
            Some(Square::Occupied(_)) => {
                Err(EngineError::illegal(IllegalMoveReason::Occupied(index)))
            }
            Some(Square::Empty) => {
                self.squares[index] = Square::Occupied(mark);
                Ok(())
            }
        }
    }

    /// Empties the cell at `index`, returning the mark it held.
    ///
    /// Only undo uses this; normal play never clears a cell.
    pub fn clear(&mut self, index: usize) -> Option<Mark> {
        let slot = self.squares.get_mut(index)?;
        std::mem::take(slot).mark()
    }

    /// True when no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.squares.iter().all(|s| *s != Square::Empty)
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.squares.iter().filter(|s| **s != Square::Empty).count()
    }

    /// Empty cell indices in ascending order.
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        (0..CELL_COUNT).filter(|&i| self.squares[i] == Square::Empty)
    }

    /// True if `mark` fills at least one winning line.
    pub fn has_line(&self, mark: Mark) -> bool {
        let sq = Square::Occupied(mark);
        WINNING_LINES
            .iter()
            .any(|line| line.iter().all(|&i| self.squares[i] == sq))
    }

    /// Returns the mark holding a complete line, if any.
    ///
    /// Legal play never lets both marks complete a line; if a hand-built
    /// board has both, X is reported.
    #[instrument(level = "trace", skip(self))]
    pub fn winner(&self) -> Option<Mark> {
        [Mark::X, Mark::O].into_iter().find(|&m| self.has_line(m))
    }

    /// Every winning line completed by `mark`.
    pub fn winning_lines(&self, mark: Mark) -> Vec<[usize; 3]> {
        let sq = Square::Occupied(mark);
        WINNING_LINES
            .iter()
            .copied()
            .filter(|line| line.iter().all(|&i| self.squares[i] == sq))
            .collect()
    }

    /// Sorted union of the cells on `mark`'s winning lines.
    pub fn winning_cells(&self, mark: Mark) -> Vec<usize> {
        let mut cells: Vec<usize> = self.winning_lines(mark).into_iter().flatten().collect();
        cells.sort_unstable();
        cells.dedup();
        cells
    }

    /// True if placing `mark` at the empty cell `index` completes a line.
    pub fn would_win(&self, index: usize, mark: Mark) -> bool {
        let mut probe = *self;
        probe.apply(index, mark).is_ok() && probe.has_line(mark)
    }

    /// Writes a mark without legality checks; the search restores the cell itself.
    pub(crate) fn put(&mut self, index: usize, square: Square) {
        self.squares[index] = square;
    }
}
