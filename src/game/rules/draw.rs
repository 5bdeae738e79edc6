//! Draw detection.

use crate::game::board::Board;
use tracing::instrument;

/// Checks if the board is full (every cell occupied).
///
/// A full board with no winner indicates a draw.
#[instrument(skip(board), fields(size = board.size()))]
pub fn is_full(board: &Board) -> bool {
    board.is_full()
}
