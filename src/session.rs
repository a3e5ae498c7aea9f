//! Owned game session state machine.
//!
//! One `GameSession` holds the board, the side to move, and the turn phase.
//! It is passed explicitly to the driver; there is no ambient shared state,
//! so test harnesses can run independent sessions side by side.

use crate::game::{Board, Cell, GameLabel, Mark, classify};
use derive_getters::Getters;
use tracing::{debug, info, instrument};

/// Turn phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a human cell selection.
    AwaitingHuman,
    /// Human has moved; the bot reply is pending.
    AwaitingBot,
    /// Game over. Absorbing: only a reset leaves this phase.
    Terminal,
}

/// Why a move was not applied. Rejections are silent at the user level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejected {
    /// The cell index is outside 0-8.
    OutOfRange,
    /// The cell is already occupied.
    Occupied,
    /// The session is not in the phase this move belongs to.
    WrongPhase,
}

/// A tic-tac-toe session: board, side to move, phase, and epoch.
///
/// The board mutates exactly once per accepted move and is replaced
/// wholesale on reset. The epoch increases on every reset; prediction
/// rounds launched under an older epoch are discarded on arrival.
#[derive(Debug, Clone, Getters)]
pub struct GameSession {
    /// Current board.
    board: Board,
    /// Side to move. Flips after every accepted move, including the last.
    to_move: Mark,
    /// Turn phase.
    phase: Phase,
    /// Reset generation for stale-response filtering.
    epoch: u64,
}

impl GameSession {
    /// Creates a fresh session: empty board, X to move, awaiting human.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating game session");
        Self {
            board: Board::new(),
            to_move: Mark::X,
            phase: Phase::AwaitingHuman,
            epoch: 0,
        }
    }

    /// Applies the human move (X) at the given cell.
    ///
    /// Returns the label of the resulting board. Rejected without state
    /// change if the session is terminal, the bot reply is pending, or the
    /// cell is unavailable.
    #[instrument(skip(self))]
    pub fn place_human(&mut self, index: usize) -> Result<GameLabel, MoveRejected> {
        if self.phase != Phase::AwaitingHuman {
            return Err(MoveRejected::WrongPhase);
        }
        self.place(index, Mark::X)
    }

    /// Applies the bot move (O) at the given cell.
    #[instrument(skip(self))]
    pub fn place_bot(&mut self, index: usize) -> Result<GameLabel, MoveRejected> {
        if self.phase != Phase::AwaitingBot {
            return Err(MoveRejected::WrongPhase);
        }
        self.place(index, Mark::O)
    }

    fn place(&mut self, index: usize, mark: Mark) -> Result<GameLabel, MoveRejected> {
        if index >= 9 {
            return Err(MoveRejected::OutOfRange);
        }
        if !self.board.is_empty(index) {
            return Err(MoveRejected::Occupied);
        }

        self.board
            .set(index, Cell::Occupied(mark))
            .map_err(|_| MoveRejected::OutOfRange)?;
        self.to_move = mark.opponent();

        let label = classify(&self.board);
        self.phase = if label.is_terminal() {
            Phase::Terminal
        } else {
            match mark {
                Mark::X => Phase::AwaitingBot,
                Mark::O => Phase::AwaitingHuman,
            }
        };

        debug!(index, %mark, %label, phase = ?self.phase, "Move applied");
        Ok(label)
    }

    /// Label of the current board, recomputed on demand.
    pub fn label(&self) -> GameLabel {
        classify(&self.board)
    }

    /// Replaces the board wholesale and returns to the initial state.
    ///
    /// Bumps the epoch so responses from rounds launched before the reset
    /// are discarded. Metrics are untouched; a board reset is not a session
    /// reset.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.to_move = Mark::X;
        self.phase = Phase::AwaitingHuman;
        self.epoch += 1;
        info!(epoch = self.epoch, "Session reset");
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_initial_state() {
        let session = GameSession::new();
        assert_eq!(*session.phase(), Phase::AwaitingHuman);
        assert_eq!(*session.to_move(), Mark::X);
        assert_eq!(session.board().empty_indexes().len(), 9);
        assert_eq!(*session.epoch(), 0);
    }

    #[test]
    fn test_human_move_flips_turn_and_phase() {
        let mut session = GameSession::new();
        let label = session.place_human(4).unwrap();
        assert_eq!(label, GameLabel::InProgress);
        assert_eq!(*session.to_move(), Mark::O);
        assert_eq!(*session.phase(), Phase::AwaitingBot);
    }

    #[test]
    fn test_occupied_cell_is_rejected_without_change() {
        let mut session = GameSession::new();
        session.place_human(4).unwrap();
        session.place_bot(0).unwrap();

        let before = session.clone();
        assert_eq!(session.place_human(4), Err(MoveRejected::Occupied));
        assert_eq!(session.board(), before.board());
        assert_eq!(session.to_move(), before.to_move());
        assert_eq!(session.phase(), before.phase());
    }

    #[test]
    fn test_bot_move_out_of_phase_is_rejected() {
        let mut session = GameSession::new();
        assert_eq!(session.place_bot(0), Err(MoveRejected::WrongPhase));
    }

    #[test]
    fn test_terminal_is_absorbing() {
        let mut session = GameSession::new();
        // X: 0, 1, 2 wins; O replies at 3, 4.
        session.place_human(0).unwrap();
        session.place_bot(3).unwrap();
        session.place_human(1).unwrap();
        session.place_bot(4).unwrap();
        let label = session.place_human(2).unwrap();
        assert_eq!(label, GameLabel::XWins);
        assert_eq!(*session.phase(), Phase::Terminal);

        assert_eq!(session.place_human(5), Err(MoveRejected::WrongPhase));
        assert_eq!(session.place_bot(5), Err(MoveRejected::WrongPhase));
    }

    #[test]
    fn test_reset_restores_initial_state_and_bumps_epoch() {
        let mut session = GameSession::new();
        session.place_human(0).unwrap();
        session.place_bot(4).unwrap();
        session.reset();

        assert_eq!(*session.phase(), Phase::AwaitingHuman);
        assert_eq!(*session.to_move(), Mark::X);
        assert_eq!(session.board().empty_indexes().len(), 9);
        assert_eq!(*session.epoch(), 1);
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let mut session = GameSession::new();
        assert_eq!(session.place_human(9), Err(MoveRejected::OutOfRange));
    }
}
