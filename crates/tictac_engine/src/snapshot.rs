//! Save/restore projection of the game state.
//!
//! The engine only defines and validates the shape; storing the JSON is
//! the caller's business.

use crate::board::{Board, Mark, Square, CELL_COUNT};
use crate::error::EngineError;
use crate::game::{GameMode, GameState, MoveReport};
use crate::ledger::{Move, MoveLedger};
use crate::search::Difficulty;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{info, instrument, warn};

/// Flat structural copy of a game, keyed for JSON.
///
/// Fields are public so a caller can build one from any source; nothing is
/// trusted until [`GameState::restore`] validates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Cells in row-major order.
    pub board: Vec<Square>,
    /// Mark to move.
    pub current_player: Mark,
    /// Two-player or versus-AI.
    pub game_mode: GameMode,
    /// Wins for X.
    pub score_x: i64,
    /// Wins for O.
    pub score_o: i64,
    /// Moves in play order.
    pub move_history: Vec<Move>,
    /// AI tier; optional, the live setting is kept when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl Snapshot {
    /// Decodes a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// `CorruptSnapshot` for malformed JSON, missing keys or bad mark values.
    #[instrument(skip(json), fields(len = json.len()))]
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(|e| {
            warn!(error = %e, "Snapshot JSON rejected");
            EngineError::from(e)
        })
    }

    /// Encodes the snapshot as JSON.
    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds a new state from this snapshot.
    ///
    /// Difficulty falls back to the default tier and the AI plays O.
    pub fn restore(self) -> Result<GameState, EngineError> {
        let mut state = GameState::default();
        state.restore(self)?;
        Ok(state)
    }

    /// Checks every field and returns the parts of a state.
    fn validate(&self) -> Result<(Board, MoveLedger, u32, u32), EngineError> {
        let squares: [Square; CELL_COUNT] = self.board.as_slice().try_into().map_err(|_| {
            EngineError::corrupt(format!(
                "board has {} cells, expected {}",
                self.board.len(),
                CELL_COUNT
            ))
        })?;
        let board = Board::from_squares(squares);

        let score_x = u32::try_from(self.score_x)
            .map_err(|_| EngineError::corrupt(format!("invalid scoreX {}", self.score_x)))?;
        let score_o = u32::try_from(self.score_o)
            .map_err(|_| EngineError::corrupt(format!("invalid scoreO {}", self.score_o)))?;

        let mut seen = HashSet::new();
        for mov in &self.move_history {
            if mov.index() >= CELL_COUNT {
                return Err(EngineError::corrupt(format!(
                    "move index {} out of range",
                    mov.index()
                )));
            }
            if !seen.insert(mov.index()) {
                return Err(EngineError::corrupt(format!(
                    "cell {} played twice",
                    mov.index()
                )));
            }
            if board.get(mov.index()) != Some(Square::Occupied(mov.player())) {
                return Err(EngineError::corrupt(format!(
                    "move {} does not match the board",
                    mov
                )));
            }
        }
        if self.move_history.len() != board.occupied_count() {
            return Err(EngineError::corrupt(format!(
                "{} moves recorded for {} occupied cells",
                self.move_history.len(),
                board.occupied_count()
            )));
        }

        Ok((board, self.move_history.clone().into(), score_x, score_o))
    }
}

impl GameState {
    /// Captures the state for persistence.
    #[instrument(skip(self))]
    pub fn capture(&self) -> Snapshot {
        Snapshot {
            board: self.board().squares().to_vec(),
            current_player: self.current_player(),
            game_mode: self.mode(),
            score_x: i64::from(self.score_x()),
            score_o: i64::from(self.score_o()),
            move_history: self.ledger().moves().to_vec(),
            difficulty: Some(self.difficulty()),
        }
    }

    /// Replaces this state with a snapshot's contents.
    ///
    /// All or nothing: on error the state is untouched. The restored game is
    /// always in progress, even if the saved board was already decided. The
    /// AI mark is kept from the live state.
    ///
    /// # Errors
    ///
    /// `CorruptSnapshot` if the board length, scores or history are invalid.
    #[instrument(skip(self, snapshot))]
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<MoveReport, EngineError> {
        let (board, ledger, score_x, score_o) = snapshot.validate().inspect_err(|e| {
            warn!(error = %e, "Snapshot rejected");
        })?;
        *self = GameState::from_parts(
            board,
            snapshot.current_player,
            snapshot.game_mode,
            snapshot.difficulty.unwrap_or(self.difficulty()),
            self.ai_mark(),
            ledger,
            score_x,
            score_o,
        );
        info!(
            moves = self.ledger().len(),
            mode = ?self.mode(),
            "Game restored from snapshot"
        );
        Ok(self.report())
    }
}
