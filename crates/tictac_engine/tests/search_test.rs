//! Tests for the AI tiers played through the state machine.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use tictac_engine::{
    best_move, choose_move, evaluate, heuristic_move, Board, Difficulty, GameMode, GameState,
    Mark, Outcome, Square,
};

fn board_from(cells: [&str; 9]) -> Board {
    let mut squares = [Square::Empty; 9];
    for (i, cell) in cells.iter().enumerate() {
        squares[i] = match *cell {
            "X" => Square::Occupied(Mark::X),
            "O" => Square::Occupied(Mark::O),
            _ => Square::Empty,
        };
    }
    Board::from_squares(squares)
}

#[test]
fn test_medium_blocks_top_row() {
    let board = board_from(["X", "X", "", "", "O", "", "", "", ""]);
    assert_eq!(heuristic_move(&board, Mark::O), Some(2));
    let mut rng = StdRng::seed_from_u64(3);
    assert_eq!(
        choose_move(&board, Mark::O, Difficulty::Medium, &mut rng),
        Some(2)
    );
}

#[test]
fn test_hard_blocks_top_row() {
    let board = board_from(["X", "X", "", "", "O", "", "", "", ""]);
    assert_eq!(best_move(&board, Mark::O, Mark::O), Some(2));
}

#[test]
fn test_hard_replies_to_center_with_corner() {
    let mut state = GameState::new(GameMode::VersusAi, Difficulty::Hard);
    state.apply_human_move(4).unwrap();
    let report = state.request_ai_move(&mut StdRng::seed_from_u64(0)).unwrap();
    assert_eq!(report.last_move().map(|m| m.index()), Some(0));
}

/// Plays every human line against the AI and returns the finished outcomes.
fn exhaust(state: &GameState, rng: &mut StdRng, outcomes: &mut Vec<Outcome>) {
    if state.outcome().is_terminal() {
        outcomes.push(state.outcome());
        return;
    }
    if state.is_ai_turn() {
        let mut next = state.clone();
        next.request_ai_move(rng).expect("AI move on its turn");
        exhaust(&next, rng, outcomes);
        return;
    }
    for cell in state.board().empty_cells() {
        let mut next = state.clone();
        next.apply_human_move(cell).expect("empty cell is legal");
        exhaust(&next, rng, outcomes);
    }
}

#[test]
fn test_hard_as_o_never_loses() {
    let state = GameState::new(GameMode::VersusAi, Difficulty::Hard);
    let mut outcomes = Vec::new();
    exhaust(&state, &mut StdRng::seed_from_u64(0), &mut outcomes);
    assert!(!outcomes.is_empty());
    assert!(outcomes.iter().all(|o| *o != Outcome::Won(Mark::X)));
    assert!(outcomes.contains(&Outcome::Won(Mark::O)));
}

#[test]
fn test_hard_as_x_never_loses() {
    let state = GameState::new(GameMode::VersusAi, Difficulty::Hard).with_ai_mark(Mark::X);
    assert!(state.is_ai_turn());
    let mut outcomes = Vec::new();
    exhaust(&state, &mut StdRng::seed_from_u64(0), &mut outcomes);
    assert!(!outcomes.is_empty());
    assert!(outcomes.iter().all(|o| *o != Outcome::Won(Mark::O)));
}

#[test]
fn test_medium_can_be_beaten() {
    // Medium answers with the first free cells, then can only block one
    // prong of the fork on 2-4-6 and 2-5-8.
    let mut state = GameState::new(GameMode::VersusAi, Difficulty::Medium);
    let mut rng = StdRng::seed_from_u64(0);
    for (human, ai) in [(4, 0), (8, 1), (2, 5)] {
        state.apply_human_move(human).unwrap();
        let report = state.request_ai_move(&mut rng).unwrap();
        assert_eq!(report.last_move().map(|m| m.index()), Some(ai));
    }
    let report = state.apply_human_move(6).unwrap();
    assert_eq!(report.outcome(), &Outcome::Won(Mark::X));
    assert_eq!(report.winning_cells(), &vec![2, 4, 6]);
}

#[test]
fn test_easy_only_plays_legal_cells() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        let mut state = GameState::new(GameMode::VersusAi, Difficulty::Easy);
        while !state.outcome().is_terminal() {
            if state.is_ai_turn() {
                let before = *state.board();
                let report = state.request_ai_move(&mut rng).unwrap();
                let cell = report.last_move().map(|m| m.index()).unwrap();
                assert!(before.is_empty(cell));
            } else {
                let cell = state.board().empty_cells().next().unwrap();
                state.apply_human_move(cell).unwrap();
            }
        }
    }
}

fn reachable(board: &mut Board, to_move: Mark, seen: &mut HashSet<(Board, Mark)>) {
    if board.winner().is_some() || board.is_full() || !seen.insert((*board, to_move)) {
        return;
    }
    let empty: Vec<usize> = board.empty_cells().collect();
    for cell in empty {
        board.apply(cell, to_move).unwrap();
        reachable(board, to_move.opponent(), seen);
        board.clear(cell);
    }
}

#[test]
fn test_fixed_o_perspective_picks_the_same_cells() {
    // Scoring from a fixed O-max/X-min perspective is the mirror of scoring
    // from the mover's own perspective, so the chosen cells agree.
    let mut seen = HashSet::new();
    reachable(&mut Board::new(), Mark::X, &mut seen);
    for (board, to_move) in seen {
        assert_eq!(
            best_move(&board, to_move, to_move),
            best_move(&board, to_move, Mark::O),
            "diverged on {:?} with {} to move",
            board,
            to_move
        );
        assert_eq!(
            evaluate(&board, to_move, Mark::X),
            -evaluate(&board, to_move, Mark::O)
        );
    }
}
