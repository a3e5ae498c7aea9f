//! Tests for the game session state machine.

use tictactoe_oracle::{GameLabel, GameSession, Mark, MoveRejected, Phase};

#[test]
fn test_session_starts_awaiting_human_with_x() {
    let session = GameSession::new();
    assert_eq!(*session.phase(), Phase::AwaitingHuman);
    assert_eq!(*session.to_move(), Mark::X);
    assert_eq!(session.label(), GameLabel::InProgress);
}

#[test]
fn test_moves_alternate_strictly() {
    let mut session = GameSession::new();
    session.place_human(0).unwrap();
    assert_eq!(*session.to_move(), Mark::O);

    // A second human move before the bot reply is rejected.
    assert_eq!(session.place_human(1), Err(MoveRejected::WrongPhase));

    session.place_bot(4).unwrap();
    assert_eq!(*session.to_move(), Mark::X);
    assert_eq!(*session.phase(), Phase::AwaitingHuman);
}

#[test]
fn test_occupied_cell_move_is_no_op() {
    let mut session = GameSession::new();
    session.place_human(4).unwrap();
    session.place_bot(0).unwrap();

    let board_before = session.board().clone();
    let turn_before = *session.to_move();
    let phase_before = *session.phase();

    assert_eq!(session.place_human(0), Err(MoveRejected::Occupied));
    assert_eq!(session.board(), &board_before);
    assert_eq!(*session.to_move(), turn_before);
    assert_eq!(*session.phase(), phase_before);
}

#[test]
fn test_moves_after_terminal_are_no_ops() {
    let mut session = GameSession::new();
    session.place_human(0).unwrap();
    session.place_bot(3).unwrap();
    session.place_human(1).unwrap();
    session.place_bot(4).unwrap();
    assert_eq!(session.place_human(2).unwrap(), GameLabel::XWins);

    let board_before = session.board().clone();
    assert_eq!(session.place_human(5), Err(MoveRejected::WrongPhase));
    assert_eq!(session.place_bot(5), Err(MoveRejected::WrongPhase));
    assert_eq!(session.board(), &board_before);
}

#[test]
fn test_draw_game_reaches_terminal() {
    let mut session = GameSession::new();
    // Ends at x x o / o o x / x o x: full board, no line.
    session.place_human(0).unwrap();
    session.place_bot(2).unwrap();
    session.place_human(1).unwrap();
    session.place_bot(3).unwrap();
    session.place_human(5).unwrap();
    session.place_bot(4).unwrap();
    session.place_human(6).unwrap();
    session.place_bot(7).unwrap();
    let label = session.place_human(8).unwrap();
    assert_eq!(label, GameLabel::Draw);
    assert_eq!(*session.phase(), Phase::Terminal);
}

#[test]
fn test_reset_restores_board_and_bumps_epoch() {
    let mut session = GameSession::new();
    session.place_human(0).unwrap();
    session.place_bot(4).unwrap();
    let epoch_before = *session.epoch();

    session.reset();

    assert_eq!(*session.phase(), Phase::AwaitingHuman);
    assert_eq!(*session.to_move(), Mark::X);
    assert_eq!(session.board().empty_indexes().len(), 9);
    assert_eq!(*session.epoch(), epoch_before + 1);
}

#[test]
fn test_independent_sessions_do_not_share_state() {
    let mut a = GameSession::new();
    let b = GameSession::new();
    a.place_human(0).unwrap();
    assert_eq!(b.board().empty_indexes().len(), 9);
    assert_eq!(*b.phase(), Phase::AwaitingHuman);
}
