//! Tests for the game state machine.

use kinarow::game::{Cell, Game, GameStatus, PlayOutcome, Player};

#[test]
fn test_fresh_game_state() {
    let game = Game::new(3, 3);
    assert_eq!(game.current_player(), Player::X);
    assert_eq!(game.status(), GameStatus::InProgress);
    assert_eq!(game.move_count(), 0);
    assert!(game.board().cells().iter().all(|c| *c == Cell::Empty));
}

#[test]
fn test_play_writes_active_symbol_and_counts() {
    let mut game = Game::new(3, 3);
    let before = game.current_player();
    assert_eq!(game.play(1, 1), PlayOutcome::Continued);
    assert_eq!(game.board().get(1, 1), Some(Cell::Occupied(before)));
    assert_eq!(game.move_count(), 1);
    assert_eq!(game.current_player(), before.opponent());
}

#[test]
fn test_top_row_win_on_fifth_move() {
    // 3x3, K=3: X(0,0) O(1,1) X(0,1) O(2,2) X(0,2) -> X wins after move 5
    let mut game = Game::new(3, 3);
    assert_eq!(game.play(0, 0), PlayOutcome::Continued);
    assert_eq!(game.play(1, 1), PlayOutcome::Continued);
    assert_eq!(game.play(0, 1), PlayOutcome::Continued);
    assert_eq!(game.play(2, 2), PlayOutcome::Continued);

    let outcome = game.play(0, 2);
    let PlayOutcome::Finished(report) = outcome else {
        panic!("expected terminal transition, got {outcome:?}");
    };
    assert_eq!(game.status(), GameStatus::Won(Player::X));
    assert_eq!(*report.status(), GameStatus::Won(Player::X));
    assert_eq!(*report.moves(), 5);
    assert_eq!(*report.board_size(), 3);
}

#[test]
fn test_full_board_without_line_is_draw() {
    // X O X / O X X / O X O in play order, no three in a row
    let mut game = Game::new(3, 3);
    let moves = [
        (0, 0), // X
        (0, 1), // O
        (0, 2), // X
        (1, 0), // O
        (1, 1), // X
        (2, 0), // O
        (1, 2), // X
        (2, 2), // O
        (2, 1), // X, ninth move fills the board
    ];
    for (i, (row, col)) in moves.iter().enumerate() {
        let outcome = game.play(*row, *col);
        if i < moves.len() - 1 {
            assert_eq!(outcome, PlayOutcome::Continued, "move {i} should continue");
        } else {
            assert!(matches!(outcome, PlayOutcome::Finished(_)));
        }
    }
    assert_eq!(game.status(), GameStatus::Draw);
    assert_eq!(game.move_count(), 9);
}

#[test]
fn test_five_by_five_row_win_exactly_on_fourth_x_move() {
    // 5x5, K=4: X builds (2,0)..(2,3) while O plays elsewhere
    let mut game = Game::new(5, 4);
    assert_eq!(game.play(2, 0), PlayOutcome::Continued); // X
    assert_eq!(game.play(0, 0), PlayOutcome::Continued); // O
    assert_eq!(game.play(2, 1), PlayOutcome::Continued); // X
    assert_eq!(game.play(0, 1), PlayOutcome::Continued); // O
    assert_eq!(game.play(2, 2), PlayOutcome::Continued); // X, run of 3, no win yet
    assert_eq!(game.status(), GameStatus::InProgress);
    assert_eq!(game.play(0, 2), PlayOutcome::Continued); // O

    assert!(matches!(game.play(2, 3), PlayOutcome::Finished(_)));
    assert_eq!(game.status(), GameStatus::Won(Player::X));
}

#[test]
fn test_occupied_cell_is_silent_noop() {
    let mut game = Game::new(3, 3);
    game.play(0, 0);
    let board_before = game.board().clone();
    let player_before = game.current_player();

    assert_eq!(game.play(0, 0), PlayOutcome::Ignored);
    assert_eq!(game.board(), &board_before);
    assert_eq!(game.current_player(), player_before);
    assert_eq!(game.status(), GameStatus::InProgress);
    assert_eq!(game.move_count(), 1);
}

#[test]
fn test_out_of_range_is_silent_noop() {
    let mut game = Game::new(3, 3);
    assert_eq!(game.play(3, 0), PlayOutcome::Ignored);
    assert_eq!(game.play(0, 99), PlayOutcome::Ignored);
    assert_eq!(game.move_count(), 0);
}

#[test]
fn test_moves_after_terminal_ignored() {
    let mut game = Game::new(3, 3);
    for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        game.play(row, col);
    }
    assert!(matches!(game.play(0, 2), PlayOutcome::Finished(_)));

    // Only the first terminal transition carries a report.
    assert_eq!(game.play(2, 2), PlayOutcome::Ignored);
    assert_eq!(game.play(2, 2), PlayOutcome::Ignored);
    assert_eq!(game.status(), GameStatus::Won(Player::X));
    assert_eq!(game.move_count(), 5);
}

#[test]
fn test_reset_clamps_win_length_to_board() {
    // Reset 3x3/K=3 to 7x7 with K requested as 9 -> effective K is 7
    let mut game = Game::new(3, 3);
    game.play(0, 0);
    game.reset(Some(7), Some(9));

    assert_eq!(game.board().size(), 7);
    assert_eq!(game.win_length(), 7);
    assert_eq!(game.current_player(), Player::X);
    assert_eq!(game.move_count(), 0);
    assert_eq!(game.status(), GameStatus::InProgress);
    assert!(game.board().cells().iter().all(|c| *c == Cell::Empty));
}

#[test]
fn test_reset_defaults_reuse_current_settings() {
    let mut game = Game::new(5, 4);
    game.play(0, 0);
    game.reset(None, None);
    assert_eq!(game.board().size(), 5);
    assert_eq!(game.win_length(), 4);
    assert_eq!(game.move_count(), 0);
}

#[test]
fn test_reset_leaves_terminal_state() {
    let mut game = Game::new(3, 3);
    for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
        game.play(row, col);
    }
    assert_eq!(game.status(), GameStatus::Won(Player::X));

    game.reset(None, None);
    assert_eq!(game.status(), GameStatus::InProgress);
    assert_eq!(game.play(1, 1), PlayOutcome::Continued);
}

#[test]
fn test_diagonal_win_four_by_four() {
    // 4x4, K=4: X on the main diagonal, O elsewhere
    let mut game = Game::new(4, 4);
    assert_eq!(game.play(0, 0), PlayOutcome::Continued); // X
    assert_eq!(game.play(0, 1), PlayOutcome::Continued); // O
    assert_eq!(game.play(1, 1), PlayOutcome::Continued); // X
    assert_eq!(game.play(0, 2), PlayOutcome::Continued); // O
    assert_eq!(game.play(2, 2), PlayOutcome::Continued); // X
    assert_eq!(game.play(0, 3), PlayOutcome::Continued); // O

    let outcome = game.play(3, 3);
    assert!(matches!(outcome, PlayOutcome::Finished(_)));
    assert_eq!(game.status(), GameStatus::Won(Player::X));
}
