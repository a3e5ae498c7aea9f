//! Placeholder opponent: uniform random over empty cells.

use crate::game::Board;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Opponent that picks uniformly at random among the empty cells.
///
/// Deliberately not a learned policy; it exists to keep the game moving so
/// the oracle has states to classify.
#[derive(Debug)]
pub struct RandomBot {
    rng: StdRng,
}

impl RandomBot {
    /// Creates a bot seeded from the OS.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a deterministically seeded bot for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Picks an empty cell, or `None` on a full board.
    pub fn choose(&mut self, board: &Board) -> Option<usize> {
        let empty = board.empty_indexes();
        if empty.is_empty() {
            return None;
        }
        let pick = self.rng.random_range(0..empty.len());
        Some(empty[pick])
    }
}

impl Default for RandomBot {
    fn default() -> Self {
        Self::new()
    }
}
