//! Board-state classification: winner, threat, and label derivation.

use super::board::{Board, Cell, Mark};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// The 8 winning lines in scan order: rows, columns, diagonals.
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Authoritative label for a board state.
///
/// Never cached: always recomputed from the board. The serde forms are the
/// oracle wire contract and must round-trip losslessly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameLabel {
    /// Game is ongoing with no line one move from completion.
    #[serde(rename = "Tem jogo")]
    InProgress,
    /// Some line is one move from completion for either player.
    #[serde(rename = "Possibilidade de Fim de Jogo")]
    NearEnd,
    /// X has three in a row.
    #[serde(rename = "X vence")]
    XWins,
    /// O has three in a row.
    #[serde(rename = "O vence")]
    OWins,
    /// Board is full with no winner.
    #[serde(rename = "Empate")]
    Draw,
}

impl GameLabel {
    /// Wire string for this label.
    pub fn wire_name(self) -> &'static str {
        match self {
            GameLabel::InProgress => "Tem jogo",
            GameLabel::NearEnd => "Possibilidade de Fim de Jogo",
            GameLabel::XWins => "X vence",
            GameLabel::OWins => "O vence",
            GameLabel::Draw => "Empate",
        }
    }

    /// True for labels that end the game.
    pub fn is_terminal(self) -> bool {
        matches!(self, GameLabel::XWins | GameLabel::OWins | GameLabel::Draw)
    }
}

impl std::fmt::Display for GameLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

/// Checks if there is a winner on the board.
///
/// Scans the 8 lines in fixed order and returns the occupant of the first
/// line whose three cells are equal and non-empty.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Mark> {
    for [a, b, c] in WIN_LINES {
        let cell = board.get(a);
        if cell != Some(Cell::Empty) && cell == board.get(b) && cell == board.get(c) {
            if let Some(Cell::Occupied(mark)) = cell {
                return Some(mark);
            }
        }
    }
    None
}

/// Checks whether any line is one move from completion.
///
/// True iff some line has exactly one empty cell and the other two equal
/// and non-empty, for either player.
#[instrument(skip(board))]
pub fn has_threat(board: &Board) -> bool {
    for [a, b, c] in WIN_LINES {
        let trio = [board.get(a), board.get(b), board.get(c)];
        let empties = trio.iter().filter(|s| **s == Some(Cell::Empty)).count();
        let xs = trio
            .iter()
            .filter(|s| **s == Some(Cell::Occupied(Mark::X)))
            .count();
        let os = trio
            .iter()
            .filter(|s| **s == Some(Cell::Occupied(Mark::O)))
            .count();
        if empties == 1 && (xs == 2 || os == 2) {
            return true;
        }
    }
    false
}

/// Computes the authoritative label for a board.
///
/// Precedence: winner, then draw, then threat, then in-progress.
#[instrument(skip(board))]
pub fn classify(board: &Board) -> GameLabel {
    match check_winner(board) {
        Some(Mark::X) => return GameLabel::XWins,
        Some(Mark::O) => return GameLabel::OWins,
        None => {}
    }
    if board.is_full() {
        return GameLabel::Draw;
    }
    if has_threat(board) {
        return GameLabel::NearEnd;
    }
    GameLabel::InProgress
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(tokens: [&str; 9]) -> Board {
        let mut board = Board::new();
        for (i, token) in tokens.iter().enumerate() {
            board.set(i, Cell::from_token(token).unwrap()).unwrap();
        }
        board
    }

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new();
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_winner_top_row() {
        let board = board_from(["x", "x", "x", "b", "b", "b", "b", "b", "b"]);
        assert_eq!(check_winner(&board), Some(Mark::X));
    }

    #[test]
    fn test_winner_column() {
        let board = board_from(["o", "b", "b", "o", "b", "b", "o", "b", "b"]);
        assert_eq!(check_winner(&board), Some(Mark::O));
    }

    #[test]
    fn test_winner_diagonal() {
        let board = board_from(["o", "b", "b", "b", "o", "b", "b", "b", "o"]);
        assert_eq!(check_winner(&board), Some(Mark::O));
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board = board_from(["x", "x", "b", "b", "b", "b", "b", "b", "b"]);
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_threat_two_with_gap() {
        let board = board_from(["x", "b", "x", "b", "b", "b", "b", "b", "b"]);
        assert!(has_threat(&board));
    }

    #[test]
    fn test_no_threat_mixed_line() {
        let board = board_from(["x", "o", "b", "b", "b", "b", "b", "b", "b"]);
        assert!(!has_threat(&board));
    }

    #[test]
    fn test_classify_winner_beats_threat() {
        // X row 0 complete while row 1 is one move from completion for O.
        let board = board_from(["x", "x", "x", "o", "o", "b", "b", "b", "b"]);
        assert_eq!(classify(&board), GameLabel::XWins);
    }

    #[test]
    fn test_label_wire_round_trip() {
        let label = GameLabel::NearEnd;
        let json = serde_json::to_string(&label).unwrap();
        assert_eq!(json, "\"Possibilidade de Fim de Jogo\"");
        assert_eq!(serde_json::from_str::<GameLabel>(&json).unwrap(), label);
    }

    #[test]
    fn test_label_rejects_unknown_string() {
        assert!(serde_json::from_str::<GameLabel>("\"In progress\"").is_err());
    }
}
