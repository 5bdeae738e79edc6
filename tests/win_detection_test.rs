//! Property tests for the incremental win detector.
//!
//! The detector only inspects the four lines through the last-played cell;
//! these tests compare it against an independent windowed full scan on
//! randomized boards.

use kinarow::game::{Board, Cell, Player, rules};

/// Reference implementation: slides every K-cell window through `(row, col)`
/// in each orientation and checks whether one is uniformly the placed symbol.
fn windowed_win(board: &Board, row: usize, col: usize, target_run: usize) -> Option<Player> {
    let player = match board.get(row, col)? {
        Cell::Occupied(player) => player,
        Cell::Empty => return None,
    };
    if target_run <= 1 {
        return Some(player);
    }

    let n = board.size() as isize;
    for (d_row, d_col) in [(0isize, 1isize), (1, 0), (1, 1), (1, -1)] {
        for offset in 0..target_run {
            let all_match = (0..target_run).all(|i| {
                let r = row as isize + d_row * (i as isize - offset as isize);
                let c = col as isize + d_col * (i as isize - offset as isize);
                r >= 0
                    && c >= 0
                    && r < n
                    && c < n
                    && board.get(r as usize, c as usize) == Some(Cell::Occupied(player))
            });
            if all_match {
                return Some(player);
            }
        }
    }
    None
}

fn random_board(rng: &mut fastrand::Rng, size: usize) -> Board {
    let mut board = Board::new(size);
    for row in 0..size {
        for col in 0..size {
            let cell = match rng.u8(0..3) {
                0 => Cell::Empty,
                1 => Cell::Occupied(Player::X),
                _ => Cell::Occupied(Player::O),
            };
            board.set(row, col, cell);
        }
    }
    board
}

#[test]
fn test_detector_matches_windowed_scan_on_random_boards() {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    for _ in 0..80 {
        let size = rng.usize(3..=15);
        let board = random_board(&mut rng, size);
        for target_run in 3..=size.min(10) {
            for row in 0..size {
                for col in 0..size {
                    let expected = windowed_win(&board, row, col, target_run);
                    let actual = rules::detect_win(&board, row, col, target_run);
                    assert_eq!(
                        actual, expected,
                        "mismatch at ({row},{col}) target {target_run} on\n{}",
                        board.display()
                    );
                }
            }
        }
    }
}

#[test]
fn test_detector_is_pure() {
    let mut rng = fastrand::Rng::with_seed(42);
    let board = random_board(&mut rng, 7);
    for row in 0..7 {
        for col in 0..7 {
            let first = rules::detect_win(&board, row, col, 4);
            let second = rules::detect_win(&board, row, col, 4);
            assert_eq!(first, second);
        }
    }
}

#[test]
fn test_edge_and_corner_wins() {
    // Runs hugging every border of a 5x5 board with K=5.
    let lines: [&[(usize, usize)]; 4] = [
        &[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)], // top edge
        &[(4, 0), (4, 1), (4, 2), (4, 3), (4, 4)], // bottom edge
        &[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)], // left edge
        &[(0, 4), (1, 4), (2, 4), (3, 4), (4, 4)], // right edge
    ];
    for line in lines {
        let mut board = Board::new(5);
        for &(row, col) in line {
            board.set(row, col, Cell::Occupied(Player::X));
        }
        for &(row, col) in line {
            assert_eq!(
                rules::detect_win(&board, row, col, 5),
                Some(Player::X),
                "missed edge win through ({row},{col})"
            );
        }
    }
}

#[test]
fn test_full_diagonal_corner_to_corner() {
    let size = 10;
    let mut board = Board::new(size);
    for i in 0..size {
        board.set(i, i, Cell::Occupied(Player::O));
    }
    assert_eq!(rules::detect_win(&board, 0, 0, 10), Some(Player::O));
    assert_eq!(rules::detect_win(&board, 9, 9, 10), Some(Player::O));
    assert_eq!(rules::detect_win(&board, 5, 5, 10), Some(Player::O));
}
