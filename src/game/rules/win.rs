//! Incremental win detection from the last played cell.

use crate::game::board::Board;
use crate::game::types::{Cell, Player};
use tracing::instrument;

/// The four line orientations through a cell: horizontal, vertical, and the
/// two diagonals. The reverse of each is covered by the backward extension.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Checks whether the move just played at `(row, col)` completed a run of
/// `target_run` same-symbol cells in any orientation.
///
/// Returns the winning player, or `None` when no orientation reaches the
/// target. The board must already contain the placed symbol at the given
/// coordinate; an empty or out-of-bounds coordinate yields `None` rather
/// than an error.
///
/// Only the four lines through the single new cell are inspected, so the
/// cost is O(`target_run`) per direction regardless of board size.
#[instrument(skip(board), fields(size = board.size()))]
pub fn detect_win(board: &Board, row: usize, col: usize, target_run: usize) -> Option<Player> {
    let player = match board.get(row, col) {
        Some(Cell::Occupied(player)) => player,
        _ => return None,
    };

    // The placed cell alone satisfies degenerate targets.
    if target_run <= 1 {
        return Some(player);
    }

    for (d_row, d_col) in DIRECTIONS {
        let mut count = 1;
        count += extend(board, player, row, col, d_row, d_col, target_run - count);
        count += extend(board, player, row, col, -d_row, -d_col, target_run - count);
        if count >= target_run {
            return Some(player);
        }
    }

    None
}

/// Counts contiguous cells matching `player` along `(d_row, d_col)` from
/// `(row, col)` exclusive, stopping at bounds, a mismatch, or `limit`.
fn extend(
    board: &Board,
    player: Player,
    row: usize,
    col: usize,
    d_row: isize,
    d_col: isize,
    limit: usize,
) -> usize {
    let mut count = 0;
    let mut r = row as isize + d_row;
    let mut c = col as isize + d_col;
    while count < limit
        && r >= 0
        && c >= 0
        && board.get(r as usize, c as usize) == Some(Cell::Occupied(player))
    {
        count += 1;
        r += d_row;
        c += d_col;
    }
    count
}
