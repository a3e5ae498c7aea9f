//! Tic-tac-toe board representation and state classification.

mod board;
mod rules;

pub use board::{Board, Cell, Mark};
pub use rules::{GameLabel, WIN_LINES, check_winner, classify, has_threat};
