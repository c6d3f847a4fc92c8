//! Error types for the tic-tac-toe engine.

use crate::board::Mark;
use derive_more::{Display, Error};

/// Why a move request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum IllegalMoveReason {
    /// The index does not name a cell on the 3x3 board.
    #[display("cell {} is outside the board (0-8)", _0)]
    OutOfRange(usize),
    /// The cell already holds a mark.
    #[display("cell {} is already occupied", _0)]
    Occupied(usize),
    /// The requester does not hold the move; carries the mark whose turn it is.
    #[display("it is {}'s turn", _0)]
    WrongTurn(Mark),
    /// An AI move was requested outside of versus-AI mode.
    #[display("there is no AI opponent in two-player mode")]
    NoAiOpponent,
}

/// Kind of engine failure.
///
/// Every kind is a rejected operation: the game state is left exactly as it
/// was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum EngineErrorKind {
    /// The move is not legal in the current position.
    #[display("Illegal move: {}", _0)]
    IllegalMove(IllegalMoveReason),
    /// The game has already been won or drawn.
    #[display("Game is already over")]
    NotActive,
    /// A snapshot could not be decoded or failed validation.
    #[display("Corrupt snapshot: {}", _0)]
    CorruptSnapshot(String),
    /// An AI reply is queued and must resolve first.
    #[display("An AI move is pending")]
    AiMovePending,
}

/// Engine error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("{} at {}:{}", kind, file, line)]
pub struct EngineError {
    /// What went wrong.
    #[error(not(source))]
    pub kind: EngineErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl EngineError {
    /// Creates a new engine error with caller location tracking.
    #[track_caller]
    pub fn new(kind: EngineErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Shorthand for an [`EngineErrorKind::IllegalMove`].
    #[track_caller]
    pub fn illegal(reason: IllegalMoveReason) -> Self {
        Self::new(EngineErrorKind::IllegalMove(reason))
    }

    /// Shorthand for an [`EngineErrorKind::CorruptSnapshot`].
    #[track_caller]
    pub fn corrupt(detail: impl Into<String>) -> Self {
        Self::new(EngineErrorKind::CorruptSnapshot(detail.into()))
    }

    /// Returns the error kind.
    pub fn kind(&self) -> &EngineErrorKind {
        &self.kind
    }
}

impl From<EngineErrorKind> for EngineError {
    #[track_caller]
    fn from(kind: EngineErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<serde_json::Error> for EngineError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::corrupt(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_location() {
        let err = EngineError::illegal(IllegalMoveReason::Occupied(4));
        let text = err.to_string();
        assert!(text.contains("cell 4 is already occupied"));
        assert!(text.contains("error.rs"));
    }

    #[test]
    fn test_kind_accessor() {
        let err: EngineError = EngineErrorKind::NotActive.into();
        assert_eq!(err.kind(), &EngineErrorKind::NotActive);
    }

    #[test]
    fn test_wrong_turn_names_mark() {
        let err = EngineError::illegal(IllegalMoveReason::WrongTurn(Mark::O));
        assert!(err.to_string().contains("it is O's turn"));
    }
}
