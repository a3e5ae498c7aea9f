//! Core board types: marks, cells, and the 3x3 grid.

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Player mark in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Mark {
    /// Returns the opponent mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

/// A cell on the board.
///
/// Serializes to the oracle wire tokens: `"b"` for empty, `"x"` / `"o"`
/// for occupied cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Empty cell.
    Empty,
    /// Cell occupied by a player.
    Occupied(Mark),
}

impl Cell {
    /// Wire token for this cell.
    pub fn token(self) -> &'static str {
        match self {
            Cell::Empty => "b",
            Cell::Occupied(Mark::X) => "x",
            Cell::Occupied(Mark::O) => "o",
        }
    }

    /// Parses a wire token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "b" => Some(Cell::Empty),
            "x" => Some(Cell::Occupied(Mark::X)),
            "o" => Some(Cell::Occupied(Mark::O)),
            _ => None,
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Cell::from_token(&token)
            .ok_or_else(|| de::Error::unknown_variant(&token, &["x", "o", "b"]))
    }
}

/// 3x3 tic-tac-toe board.
///
/// Cells are stored in row-major order (index = 3 * row + col). On the wire
/// the board is a bare 9-element array of cell tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; 9],
        }
    }

    /// Gets the cell at the given index (0-8).
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Sets the cell at the given index.
    pub fn set(&mut self, index: usize, cell: Cell) -> Result<(), &'static str> {
        if index >= 9 {
            return Err("Index out of bounds");
        }
        self.cells[index] = cell;
        Ok(())
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    /// Checks if the board is fully occupied.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| *c != Cell::Empty)
    }

    /// Returns the indexes of all empty cells, in ascending order.
    pub fn empty_indexes(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Returns all cells as a slice.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Formats the board as a human-readable grid.
    ///
    /// Empty cells show their 1-based index so the console frontend can
    /// prompt by number.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let index = row * 3 + col;
                let symbol = match self.cells[index] {
                    Cell::Empty => (index + 1).to_string(),
                    Cell::Occupied(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(9))?;
        for cell in &self.cells {
            seq.serialize_element(cell)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BoardVisitor;

        impl<'de> Visitor<'de> for BoardVisitor {
            type Value = Board;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("an array of 9 cell tokens")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Board, A::Error> {
                let mut cells = [Cell::Empty; 9];
                for (i, slot) in cells.iter_mut().enumerate() {
                    *slot = seq
                        .next_element()?
                        .ok_or_else(|| de::Error::invalid_length(i, &self))?;
                }
                if seq.next_element::<Cell>()?.is_some() {
                    return Err(de::Error::invalid_length(10, &self));
                }
                Ok(Board { cells })
            }
        }

        deserializer.deserialize_seq(BoardVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_all_empty() {
        let board = Board::new();
        assert_eq!(board.empty_indexes(), vec![0, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(!board.is_full());
    }

    #[test]
    fn test_empty_indexes_full_board() {
        let mut board = Board::new();
        for i in 0..9 {
            board.set(i, Cell::Occupied(Mark::X)).unwrap();
        }
        assert!(board.is_full());
        assert!(board.empty_indexes().is_empty());
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut board = Board::new();
        assert!(board.set(9, Cell::Occupied(Mark::O)).is_err());
    }

    #[test]
    fn test_board_wire_tokens() {
        let mut board = Board::new();
        board.set(0, Cell::Occupied(Mark::X)).unwrap();
        board.set(4, Cell::Occupied(Mark::O)).unwrap();

        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, r#"["x","b","b","b","o","b","b","b","b"]"#);

        let parsed: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, board);
    }

    #[test]
    fn test_board_rejects_bad_token() {
        let result: Result<Board, _> =
            serde_json::from_str(r#"["x","b","b","b","?","b","b","b","b"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_board_rejects_short_array() {
        let result: Result<Board, _> = serde_json::from_str(r#"["x","b","b"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_mark_wire_form() {
        assert_eq!(serde_json::to_string(&Mark::X).unwrap(), "\"x\"");
        assert_eq!(serde_json::from_str::<Mark>("\"o\"").unwrap(), Mark::O);
    }
}
