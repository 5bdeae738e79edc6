//! Board state machine driving win detection after each move.

use super::board::{self, Board};
use super::rules;
use super::types::{Cell, GameStatus, Player};
use derive_getters::Getters;
use derive_new::new;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Summary of a finished game, produced exactly once on the first terminal
/// transition. Whoever receives it is responsible for forwarding the result
/// to the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct GameReport {
    /// Final status (always `Won` or `Draw`).
    status: GameStatus,
    /// Board dimension the game was played on.
    board_size: usize,
    /// Win length in effect.
    win_length: usize,
    /// Total moves played.
    moves: usize,
    /// Wall-clock game duration in seconds.
    duration_seconds: u64,
}

/// Outcome of a single [`Game::play`] call.
///
/// Illegal submissions (terminal game, occupied cell, out-of-range
/// coordinate) are not errors; they surface as [`Ignored`] with no state
/// change.
///
/// [`Ignored`]: PlayOutcome::Ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The move was rejected; board, player, and status are unchanged.
    Ignored,
    /// The move was applied and the game continues.
    Continued,
    /// The move was applied and ended the game. The report is produced only
    /// on this first terminal transition; later calls return
    /// [`PlayOutcome::Ignored`].
    Finished(GameReport),
}

/// A single game of K-in-a-row tic-tac-toe.
///
/// Owns the board, the active player, the move count, and the terminal
/// result; the only mutating operations are [`play`] and [`reset`].
///
/// [`play`]: Game::play
/// [`reset`]: Game::reset
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    win_length: usize,
    current_player: Player,
    status: GameStatus,
    moves: usize,
    started_at: Instant,
}

impl Game {
    /// Creates a new game on an empty board.
    ///
    /// The size is clamped into the supported range and the win length is
    /// clamped against the resulting size. X moves first.
    #[instrument]
    pub fn new(size: usize, win_length: usize) -> Self {
        let board = Board::new(size);
        let win_length = board::clamp_win_length(win_length, board.size());
        info!(size = board.size(), win_length, "Starting new game");
        Self {
            board,
            win_length,
            current_player: Player::X,
            status: GameStatus::InProgress,
            moves: 0,
            started_at: Instant::now(),
        }
    }

    /// Plays the active player's symbol at the given coordinate.
    ///
    /// Returns [`PlayOutcome::Ignored`] without any state change when the
    /// game is already over, the coordinate is out of range, or the cell is
    /// occupied. Otherwise the symbol is written, win detection runs on the
    /// placed cell, and the game either finishes or passes the turn.
    #[instrument(skip(self), fields(player = %self.current_player, moves = self.moves))]
    pub fn play(&mut self, row: usize, col: usize) -> PlayOutcome {
        if self.status.is_terminal() {
            debug!("Move ignored: game already over");
            return PlayOutcome::Ignored;
        }
        if !self.board.is_empty_at(row, col) {
            debug!(row, col, "Move ignored: cell occupied or out of range");
            return PlayOutcome::Ignored;
        }

        let player = self.current_player;
        self.board.set(row, col, Cell::Occupied(player));
        self.moves += 1;

        if let Some(winner) = rules::detect_win(&self.board, row, col, self.win_length) {
            self.status = GameStatus::Won(winner);
            info!(%winner, moves = self.moves, "Game won");
            return PlayOutcome::Finished(self.report());
        }

        if rules::is_full(&self.board) {
            self.status = GameStatus::Draw;
            info!(moves = self.moves, "Game drawn");
            return PlayOutcome::Finished(self.report());
        }

        self.current_player = player.opponent();
        PlayOutcome::Continued
    }

    /// Starts a fresh game, optionally changing board size or win length.
    ///
    /// Defaults reuse the current settings. The win length is re-clamped
    /// against the (possibly new) board size, the active player returns to
    /// X, and the clock restarts.
    #[instrument(skip(self))]
    pub fn reset(&mut self, new_size: Option<usize>, new_win_length: Option<usize>) {
        let size = new_size.unwrap_or(self.board.size());
        let win_length = new_win_length.unwrap_or(self.win_length);
        self.board = Board::new(size);
        self.win_length = board::clamp_win_length(win_length, self.board.size());
        self.current_player = Player::X;
        self.status = GameStatus::InProgress;
        self.moves = 0;
        self.started_at = Instant::now();
        info!(
            size = self.board.size(),
            win_length = self.win_length,
            "Game reset"
        );
    }

    fn report(&self) -> GameReport {
        GameReport {
            status: self.status,
            board_size: self.board.size(),
            win_length: self.win_length,
            moves: self.moves,
            duration_seconds: self.started_at.elapsed().as_secs(),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player whose turn it is.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns the number of moves played so far.
    pub fn move_count(&self) -> usize {
        self.moves
    }

    /// Returns the win length in effect.
    pub fn win_length(&self) -> usize {
        self.win_length
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(board::MIN_SIZE, board::MIN_WIN_LENGTH)
    }
}
