//! Variable-size board and sizing policy.

use super::types::{Cell, Player};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Smallest supported board dimension.
pub const MIN_SIZE: usize = 3;
/// Largest supported board dimension.
pub const MAX_SIZE: usize = 15;
/// Smallest selectable win length.
pub const MIN_WIN_LENGTH: usize = 3;
/// Largest selectable win length.
pub const MAX_WIN_LENGTH: usize = 10;

/// Square N×N board of cells, row-major.
///
/// Dimensions are fixed for the lifetime of one game instance; resizing
/// always goes through [`crate::game::Game::reset`], which builds a fresh
/// board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates a new empty board of the given dimension.
    ///
    /// The requested size is clamped into `[MIN_SIZE, MAX_SIZE]` rather than
    /// rejected; configuration inconsistencies are auto-corrected.
    pub fn new(size: usize) -> Self {
        let size = size.clamp(MIN_SIZE, MAX_SIZE);
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Board dimension N.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Gets the cell at the given coordinate, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.size && col < self.size {
            Some(self.cells[row * self.size + col])
        } else {
            None
        }
    }

    /// Sets the cell at the given coordinate. Out-of-bounds writes are no-ops.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if row < self.size && col < self.size {
            self.cells[row * self.size + col] = cell;
        }
    }

    /// Checks whether the cell at the given coordinate is empty.
    ///
    /// Out-of-bounds coordinates report `false`, so callers treat them as
    /// unplayable.
    pub fn is_empty_at(&self, row: usize, col: usize) -> bool {
        matches!(self.get(row, col), Some(Cell::Empty))
    }

    /// Checks whether every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| *c != Cell::Empty)
    }

    /// Returns all cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..self.size {
            for col in 0..self.size {
                let symbol = match self.cells[row * self.size + col] {
                    Cell::Empty => '.',
                    Cell::Occupied(Player::X) => 'X',
                    Cell::Occupied(Player::O) => 'O',
                };
                result.push(symbol);
                if col < self.size - 1 {
                    result.push(' ');
                }
            }
            if row < self.size - 1 {
                result.push('\n');
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(MIN_SIZE)
    }
}

/// Clamps a requested win length against the board dimension.
///
/// The run required to win can never exceed the board itself; whenever the
/// board is resized the effective win length becomes `min(k, n)`.
pub fn clamp_win_length(win_length: usize, size: usize) -> usize {
    win_length.min(size)
}

/// Selectable win-length range offered to clients for a board of dimension
/// `size`. An interface-level constraint; the detector itself tolerates any
/// target of 1 or more.
pub fn win_length_range(size: usize) -> RangeInclusive<usize> {
    MIN_WIN_LENGTH..=size.min(MAX_WIN_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        for n in MIN_SIZE..=MAX_SIZE {
            let board = Board::new(n);
            assert_eq!(board.size(), n);
            assert_eq!(board.cells().len(), n * n);
            assert!(board.cells().iter().all(|c| *c == Cell::Empty));
        }
    }

    #[test]
    fn test_size_clamped() {
        assert_eq!(Board::new(1).size(), MIN_SIZE);
        assert_eq!(Board::new(100).size(), MAX_SIZE);
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut board = Board::new(3);
        assert_eq!(board.get(3, 0), None);
        assert_eq!(board.get(0, 3), None);
        assert!(!board.is_empty_at(5, 5));
        // Out-of-bounds write is a no-op
        board.set(9, 9, Cell::Occupied(Player::X));
        assert!(board.cells().iter().all(|c| *c == Cell::Empty));
    }

    #[test]
    fn test_is_full() {
        let mut board = Board::new(3);
        assert!(!board.is_full());
        for row in 0..3 {
            for col in 0..3 {
                board.set(row, col, Cell::Occupied(Player::X));
            }
        }
        assert!(board.is_full());
    }

    #[test]
    fn test_clamp_win_length() {
        assert_eq!(clamp_win_length(9, 7), 7);
        assert_eq!(clamp_win_length(3, 7), 3);
        assert_eq!(clamp_win_length(5, 5), 5);
    }

    #[test]
    fn test_win_length_range() {
        assert_eq!(win_length_range(3), 3..=3);
        assert_eq!(win_length_range(8), 3..=8);
        assert_eq!(win_length_range(15), 3..=10);
    }
}
