//! K-in-a-row game core: board, rules, and state machine.

mod board;
mod engine;
pub mod rules;
mod types;

pub use board::{
    Board, MAX_SIZE, MAX_WIN_LENGTH, MIN_SIZE, MIN_WIN_LENGTH, clamp_win_length, win_length_range,
};
pub use engine::{Game, GameReport, PlayOutcome};
pub use types::{Cell, GameStatus, Player};
