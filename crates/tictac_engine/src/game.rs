//! Game state machine for tic-tac-toe.

use crate::board::{Board, Mark};
use crate::error::{EngineError, EngineErrorKind, IllegalMoveReason};
use crate::ledger::{Move, MoveLedger};
use crate::search::{self, Difficulty};
use derive_getters::Getters;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Who plays the two marks.
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
)]
pub enum GameMode {
    /// Two humans share the board.
    #[default]
    #[serde(rename = "twoPlayer")]
    #[strum(to_string = "two-player", serialize = "twoPlayer")]
    TwoPlayer,
    /// A human plays against the engine.
    #[serde(rename = "ai")]
    #[strum(to_string = "ai")]
    VersusAi,
}

/// State of the current game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Moves can still be made.
    InProgress,
    /// A mark completed a line.
    Won(Mark),
    /// The board filled with no line.
    Draw,
}

impl Outcome {
    /// True once the game is won or drawn.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Won(mark) => Some(*mark),
            _ => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::InProgress => write!(f, "In progress"),
            Outcome::Won(mark) => write!(f, "Player {} wins", mark),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// Result of a mutating operation, enough for a view to redraw.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct MoveReport {
    /// Outcome after the operation.
    outcome: Outcome,
    /// Cells on the winner's completed lines, ascending; empty unless won.
    winning_cells: Vec<usize>,
    /// Move placed (or removed, for undo) by the operation.
    last_move: Option<Move>,
}

/// Complete game state.
///
/// A single owned value: every operation takes it explicitly, and a failed
/// operation leaves it untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_player: Mark,
    mode: GameMode,
    difficulty: Difficulty,
    ai_mark: Mark,
    ledger: MoveLedger,
    score_x: u32,
    score_o: u32,
    outcome: Outcome,
}

impl GameState {
    /// Creates a fresh game with zero scores. The AI, if any, plays O.
    #[instrument]
    pub fn new(mode: GameMode, difficulty: Difficulty) -> Self {
        Self {
            board: Board::new(),
            current_player: Mark::X,
            mode,
            difficulty,
            ai_mark: Mark::O,
            ledger: MoveLedger::new(),
            score_x: 0,
            score_o: 0,
            outcome: Outcome::InProgress,
        }
    }

    /// Sets which mark the AI plays and restarts the game.
    #[instrument(skip(self))]
    pub fn with_ai_mark(mut self, ai_mark: Mark) -> Self {
        self.ai_mark = ai_mark;
        self.restart();
        self
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the mark to move.
    pub fn current_player(&self) -> Mark {
        self.current_player
    }

    /// Returns the game mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Returns the AI difficulty.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Returns the mark the AI plays in versus-AI mode.
    pub fn ai_mark(&self) -> Mark {
        self.ai_mark
    }

    /// Returns the move history.
    pub fn ledger(&self) -> &MoveLedger {
        &self.ledger
    }

    /// Games won by X this session.
    pub fn score_x(&self) -> u32 {
        self.score_x
    }

    /// Games won by O this session.
    pub fn score_o(&self) -> u32 {
        self.score_o
    }

    /// Returns the outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// True when the engine, not a human, holds the move.
    pub fn is_ai_turn(&self) -> bool {
        self.mode == GameMode::VersusAi
            && self.outcome == Outcome::InProgress
            && self.current_player == self.ai_mark
    }

    /// Describes the current position without changing it.
    pub fn report(&self) -> MoveReport {
        let winning_cells = self
            .outcome
            .winner()
            .map(|mark| self.board.winning_cells(mark))
            .unwrap_or_default();
        MoveReport {
            outcome: self.outcome,
            winning_cells,
            last_move: self.ledger.last().copied(),
        }
    }

    /// Starts a new game in `mode`, keeping the scores.
    #[instrument(skip(self))]
    pub fn start_game(&mut self, mode: GameMode, difficulty: Difficulty) -> MoveReport {
        self.mode = mode;
        self.difficulty = difficulty;
        self.board = Board::new();
        self.ledger = MoveLedger::new();
        self.current_player = Mark::X;
        self.outcome = Outcome::InProgress;
        info!(?mode, ?difficulty, "Game started");
        self.report()
    }

    /// Starts over with the same mode and difficulty, keeping the scores.
    #[instrument(skip(self))]
    pub fn restart(&mut self) -> MoveReport {
        self.start_game(self.mode, self.difficulty)
    }

    /// Switches mode and starts a new game.
    #[instrument(skip(self))]
    pub fn set_mode(&mut self, mode: GameMode) -> MoveReport {
        self.start_game(mode, self.difficulty)
    }

    /// Changes the AI tier; takes effect on the next AI move.
    #[instrument(skip(self))]
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Zeroes both scores.
    #[instrument(skip(self))]
    pub fn reset_scores(&mut self) {
        self.score_x = 0;
        self.score_o = 0;
    }

    /// Places the current player's mark for a human.
    ///
    /// # Errors
    ///
    /// - `NotActive` once the game is won or drawn
    /// - `IllegalMove` for an off-board or occupied cell, or when the AI
    ///   holds the move in versus-AI mode
    #[instrument(skip(self), fields(player = ?self.current_player))]
    pub fn apply_human_move(&mut self, index: usize) -> Result<MoveReport, EngineError> {
        if self.is_ai_turn() {
            warn!(index, "Human move rejected during AI turn");
            return Err(EngineError::illegal(IllegalMoveReason::WrongTurn(
                self.current_player,
            )));
        }
        self.place(index)
    }

    /// Lets the engine choose and play a move for the AI.
    ///
    /// # Errors
    ///
    /// - `NotActive` once the game is won or drawn
    /// - `IllegalMove` outside versus-AI mode or when a human holds the move
    #[instrument(skip(self, rng), fields(difficulty = ?self.difficulty))]
    pub fn request_ai_move<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<MoveReport, EngineError> {
        if self.mode != GameMode::VersusAi {
            warn!("AI move requested in two-player mode");
            return Err(EngineError::illegal(IllegalMoveReason::NoAiOpponent));
        }
        self.ensure_active()?;
        if self.current_player != self.ai_mark {
            warn!(current = ?self.current_player, "AI move requested on a human turn");
            return Err(EngineError::illegal(IllegalMoveReason::WrongTurn(
                self.current_player,
            )));
        }

        let index = search::choose_move(&self.board, self.current_player, self.difficulty, rng)
            .ok_or_else(|| EngineError::new(EngineErrorKind::NotActive))?;
        self.place(index)
    }

    /// Takes back the last move.
    ///
    /// The undone mark moves again and the outcome returns to in-progress.
    /// Scores are not touched. Does nothing when no move has been played.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> MoveReport {
        let Some(last) = self.ledger.pop() else {
            debug!("Nothing to undo");
            return self.report();
        };
        self.board.clear(last.index());
        self.current_player = last.player();
        self.outcome = Outcome::InProgress;
        debug!(undone = %last, "Move undone");
        MoveReport {
            outcome: self.outcome,
            winning_cells: Vec::new(),
            last_move: Some(last),
        }
    }

    /// Shared move path for humans and the AI.
    fn place(&mut self, index: usize) -> Result<MoveReport, EngineError> {
        self.ensure_active()?;
        let mark = self.current_player;
        self.board.apply(index, mark).inspect_err(|e| {
            warn!(index, error = %e, "Move rejected");
        })?;
        let mov = Move::new(index, mark);
        self.ledger.push(mov);
        debug!(%mov, "Move applied");

        if self.board.has_line(mark) {
            self.outcome = Outcome::Won(mark);
            match mark {
                Mark::X => self.score_x += 1,
                Mark::O => self.score_o += 1,
            }
            info!(winner = %mark, score_x = self.score_x, score_o = self.score_o, "Game won");
        } else if self.board.is_full() {
            self.outcome = Outcome::Draw;
            info!("Game drawn");
        } else {
            self.current_player = mark.opponent();
        }

        Ok(self.report())
    }

    fn ensure_active(&self) -> Result<(), EngineError> {
        if self.outcome.is_terminal() {
            warn!(outcome = %self.outcome, "Move attempted after game end");
            return Err(EngineError::new(EngineErrorKind::NotActive));
        }
        Ok(())
    }

    /// Rebuilds a state from validated parts; used by snapshot restore.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        board: Board,
        current_player: Mark,
        mode: GameMode,
        difficulty: Difficulty,
        ai_mark: Mark,
        ledger: MoveLedger,
        score_x: u32,
        score_o: u32,
    ) -> Self {
        Self {
            board,
            current_player,
            mode,
            difficulty,
            ai_mark,
            ledger,
            score_x,
            score_o,
            outcome: Outcome::InProgress,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameMode::default(), Difficulty::default())
    }
}
