//! Ordered move history backing undo.

use crate::board::Mark;
use serde::{Deserialize, Serialize};

/// A mark placed at a cell. Immutable once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct Move {
    index: usize,
    player: Mark,
}

impl Move {
    /// Cell the mark was placed in (0-8).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Mark that was placed.
    pub fn player(&self) -> Mark {
        self.player
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.player, self.index)
    }
}

/// Append-ordered move history; undo pops strictly last-in-first-out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveLedger {
    moves: Vec<Move>,
}

impl MoveLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a move.
    pub fn push(&mut self, mov: Move) {
        self.moves.push(mov);
    }

    /// Removes and returns the most recent move.
    pub fn pop(&mut self) -> Option<Move> {
        self.moves.pop()
    }

    /// Most recent move, if any.
    pub fn last(&self) -> Option<&Move> {
        self.moves.last()
    }

    /// Number of recorded moves.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// True if nothing has been played.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Moves in play order.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }
}

impl From<Vec<Move>> for MoveLedger {
    fn from(moves: Vec<Move>) -> Self {
        Self { moves }
    }
}
