//! Play session with a delayed AI reply.
//!
//! The AI's "thinking time" is a single queued unit of work with a
//! deadline. While it is queued, human moves and undo are refused;
//! restart, a new game and a successful restore cancel it. The session
//! never sleeps itself: a driver asks for [`Session::next_deadline`], waits
//! however it likes, then calls [`Session::poll`].

use crate::board::Mark;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineErrorKind};
use crate::game::{GameMode, GameState, MoveReport};
use crate::search::Difficulty;
use crate::snapshot::Snapshot;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// A queued AI reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAiMove {
    due: Instant,
}

impl PendingAiMove {
    /// When the reply should be computed.
    pub fn due(&self) -> Instant {
        self.due
    }
}

/// A game plus its AI scheduling.
#[derive(Debug)]
pub struct Session<R = StdRng> {
    state: GameState,
    rng: R,
    ai_delay: Duration,
    pending: Option<PendingAiMove>,
}

impl Session<StdRng> {
    /// Creates a session from configuration with an OS-seeded RNG.
    #[instrument(skip(config))]
    pub fn from_config(config: &EngineConfig) -> Self {
        let state = GameState::new(*config.mode(), *config.difficulty())
            .with_ai_mark(*config.ai_mark());
        Self::with_rng(state, StdRng::from_os_rng(), config.ai_delay())
    }
}

impl<R: Rng> Session<R> {
    /// Creates a session around an existing state.
    ///
    /// Nothing is queued yet; call [`Session::resume`] if the AI may hold
    /// the move.
    pub fn with_rng(state: GameState, rng: R, ai_delay: Duration) -> Self {
        Self {
            state,
            rng,
            ai_delay,
            pending: None,
        }
    }

    /// Returns the game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mark the AI plays.
    pub fn ai_mark(&self) -> Mark {
        self.state.ai_mark()
    }

    /// The queued AI reply, if any.
    pub fn pending(&self) -> Option<PendingAiMove> {
        self.pending
    }

    /// True while an AI reply is queued.
    pub fn is_ai_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the queued AI reply.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.due)
    }

    /// Captures the game for persistence.
    pub fn capture(&self) -> Snapshot {
        self.state.capture()
    }

    /// Plays a human move and queues the AI reply if the AI is now to move.
    ///
    /// # Errors
    ///
    /// `AiMovePending` while a reply is queued, otherwise whatever
    /// [`GameState::apply_human_move`] reports.
    #[instrument(skip(self, now))]
    pub fn human_move(&mut self, index: usize, now: Instant) -> Result<MoveReport, EngineError> {
        self.ensure_idle()?;
        let report = self.state.apply_human_move(index)?;
        self.schedule_if_ai_turn(now);
        Ok(report)
    }

    /// Takes back the last move.
    ///
    /// Never queues an AI reply: after undoing the AI's move the human
    /// decides whether to undo again or [`Session::resume`].
    ///
    /// # Errors
    ///
    /// `AiMovePending` while a reply is queued.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> Result<MoveReport, EngineError> {
        self.ensure_idle()?;
        Ok(self.state.undo())
    }

    /// Starts over with the same settings, cancelling any queued reply.
    #[instrument(skip(self, now))]
    pub fn restart(&mut self, now: Instant) -> MoveReport {
        self.cancel_pending();
        let report = self.state.restart();
        self.schedule_if_ai_turn(now);
        report
    }

    /// Starts a new game with new settings, cancelling any queued reply.
    #[instrument(skip(self, now))]
    pub fn start_game(
        &mut self,
        mode: GameMode,
        difficulty: Difficulty,
        now: Instant,
    ) -> MoveReport {
        self.cancel_pending();
        let report = self.state.start_game(mode, difficulty);
        self.schedule_if_ai_turn(now);
        report
    }

    /// Changes the AI tier; a queued reply uses the new tier.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.state.set_difficulty(difficulty);
    }

    /// Zeroes both scores.
    pub fn reset_scores(&mut self) {
        self.state.reset_scores();
    }

    /// Replaces the game with a snapshot.
    ///
    /// On success any queued reply is cancelled and, if the AI was mid-turn
    /// when the snapshot was taken, a fresh one is queued. On failure the
    /// session is untouched, queued reply included.
    #[instrument(skip(self, snapshot, now))]
    pub fn restore(&mut self, snapshot: Snapshot, now: Instant) -> Result<MoveReport, EngineError> {
        let report = self.state.restore(snapshot)?;
        self.cancel_pending();
        self.schedule_if_ai_turn(now);
        Ok(report)
    }

    /// Queues an AI reply if the AI holds the move and nothing is queued.
    ///
    /// Returns true if a reply is queued afterwards.
    #[instrument(skip(self, now))]
    pub fn resume(&mut self, now: Instant) -> bool {
        self.schedule_if_ai_turn(now);
        self.is_ai_pending()
    }

    /// Runs the queued reply if its deadline has passed.
    ///
    /// Returns `None` when nothing ran.
    #[instrument(skip(self, now))]
    pub fn poll(&mut self, now: Instant) -> Option<Result<MoveReport, EngineError>> {
        match self.pending {
            Some(p) if p.due <= now => self.run_pending(),
            _ => None,
        }
    }

    /// Runs the queued reply immediately, ignoring its deadline.
    #[instrument(skip(self))]
    pub fn run_pending(&mut self) -> Option<Result<MoveReport, EngineError>> {
        self.pending.take()?;
        let result = self.state.request_ai_move(&mut self.rng);
        match &result {
            Ok(report) => debug!(outcome = %report.outcome(), "AI reply applied"),
            Err(e) => warn!(error = %e, "AI reply failed"),
        }
        Some(result)
    }

    fn ensure_idle(&self) -> Result<(), EngineError> {
        if self.pending.is_some() {
            warn!("Request refused while AI move is pending");
            return Err(EngineError::new(EngineErrorKind::AiMovePending));
        }
        Ok(())
    }

    fn schedule_if_ai_turn(&mut self, now: Instant) {
        if self.pending.is_none() && self.state.is_ai_turn() {
            let due = now + self.ai_delay;
            debug!(delay_ms = self.ai_delay.as_millis() as u64, "AI reply queued");
            self.pending = Some(PendingAiMove { due });
        }
    }

    fn cancel_pending(&mut self) {
        if self.pending.take().is_some() {
            info!("Queued AI reply cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(mode: GameMode, difficulty: Difficulty) -> Session {
        Session::with_rng(
            GameState::new(mode, difficulty),
            StdRng::seed_from_u64(11),
            Duration::from_millis(500),
        )
    }

    #[test]
    fn test_two_player_never_queues() {
        let mut s = session(GameMode::TwoPlayer, Difficulty::Hard);
        s.human_move(0, Instant::now()).unwrap();
        assert!(!s.is_ai_pending());
        s.human_move(4, Instant::now()).unwrap();
        assert_eq!(s.state().ledger().len(), 2);
    }

    #[test]
    fn test_reply_waits_for_deadline() {
        let mut s = session(GameMode::VersusAi, Difficulty::Hard);
        let t0 = Instant::now();
        s.human_move(0, t0).unwrap();
        assert_eq!(s.next_deadline(), Some(t0 + Duration::from_millis(500)));
        assert!(s.poll(t0 + Duration::from_millis(499)).is_none());
        let report = s.poll(t0 + Duration::from_millis(500)).unwrap().unwrap();
        assert_eq!(report.last_move().map(|m| m.index()), Some(4));
        assert!(!s.is_ai_pending());
    }

    #[test]
    fn test_pending_blocks_human_move_and_undo() {
        let mut s = session(GameMode::VersusAi, Difficulty::Hard);
        let t0 = Instant::now();
        s.human_move(0, t0).unwrap();
        let before = s.state().clone();
        let err = s.human_move(4, t0).unwrap_err();
        assert_eq!(err.kind(), &EngineErrorKind::AiMovePending);
        let err = s.undo().unwrap_err();
        assert_eq!(err.kind(), &EngineErrorKind::AiMovePending);
        assert_eq!(s.state(), &before);
        assert!(s.is_ai_pending());
    }

    #[test]
    fn test_restart_cancels_pending() {
        let mut s = session(GameMode::VersusAi, Difficulty::Hard);
        let t0 = Instant::now();
        s.human_move(0, t0).unwrap();
        s.restart(t0);
        assert!(!s.is_ai_pending());
        assert!(s.poll(t0 + Duration::from_secs(5)).is_none());
        assert!(s.state().ledger().is_empty());
    }

    #[test]
    fn test_undo_does_not_requeue() {
        let mut s = session(GameMode::VersusAi, Difficulty::Hard);
        let t0 = Instant::now();
        s.human_move(0, t0).unwrap();
        s.run_pending().unwrap().unwrap();
        s.undo().unwrap();
        assert_eq!(s.state().current_player(), Mark::O);
        assert!(!s.is_ai_pending());
        s.undo().unwrap();
        assert_eq!(s.state().current_player(), Mark::X);
        assert!(s.state().ledger().is_empty());
    }

    #[test]
    fn test_resume_after_undo_of_ai_move() {
        let mut s = session(GameMode::VersusAi, Difficulty::Hard);
        let t0 = Instant::now();
        s.human_move(0, t0).unwrap();
        s.run_pending().unwrap().unwrap();
        s.undo().unwrap();
        assert!(s.resume(t0));
        let report = s.run_pending().unwrap().unwrap();
        assert_eq!(report.last_move().map(|m| m.index()), Some(4));
    }

    #[test]
    fn test_ai_as_x_queues_on_start() {
        let state = GameState::new(GameMode::VersusAi, Difficulty::Medium).with_ai_mark(Mark::X);
        let mut s = Session::with_rng(state, StdRng::seed_from_u64(1), Duration::ZERO);
        let t0 = Instant::now();
        s.restart(t0);
        assert!(s.is_ai_pending());
        let report = s.poll(t0).unwrap().unwrap();
        assert_eq!(report.last_move().map(|m| m.index()), Some(0));
    }
}
