//! Plain-text board rendering.

use tictac_engine::{Board, GameState, MoveReport, Outcome, Square};

/// Renders the board; empty cells show their index, winning cells are
/// bracketed.
pub fn board(board: &Board, highlight: &[usize]) -> String {
    let cell = |i: usize| {
        let text = match board.squares()[i] {
            Square::Empty => i.to_string(),
            Square::Occupied(mark) => mark.to_string(),
        };
        if highlight.contains(&i) {
            format!("[{}]", text)
        } else {
            format!(" {} ", text)
        }
    };
    (0..3)
        .map(|row| {
            (0..3)
                .map(|col| cell(row * 3 + col))
                .collect::<Vec<_>>()
                .join("|")
        })
        .collect::<Vec<_>>()
        .join("\n---+---+---\n")
}

/// One-line status under the board.
pub fn status(state: &GameState, report: &MoveReport) -> String {
    let turn = match report.outcome() {
        Outcome::InProgress if state.is_ai_turn() => {
            format!("AI ({}) is thinking", state.current_player())
        }
        Outcome::InProgress => format!("{} to move", state.current_player()),
        done => done.to_string(),
    };
    format!(
        "{} | mode {} | difficulty {} | X {} - O {}",
        turn,
        state.mode(),
        state.difficulty(),
        state.score_x(),
        state.score_o()
    )
}

/// Board plus status for a report.
pub fn frame(state: &GameState, report: &MoveReport) -> String {
    format!(
        "{}\n{}",
        board(state.board(), report.winning_cells()),
        status(state, report)
    )
}

/// Command summary printed by `help`.
pub const HELP: &str = "\
commands:
  0-8              place a mark
  undo             take back the last move
  ai               let the AI move now if it holds the turn
  restart          new game, same settings
  mode <m>         twoPlayer or ai (starts a new game)
  difficulty <d>   easy, medium or hard
  scores           show the score
  reset            zero the score
  save [path]      write the game as JSON
  load [path]      restore a saved game
  help             this text
  quit             leave";
