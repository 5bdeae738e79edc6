//! kinarow - multiplayer K-in-a-row tic-tac-toe with accounts and stats.
//!
//! # Architecture
//!
//! - **Game**: variable-size board, incremental win detection from the last
//!   move, and the state machine driving them
//! - **Session**: two-seat multiplayer sessions, one lock per manager
//! - **Db**: diesel/SQLite persistence for accounts and finished games
//! - **Auth**: bcrypt password hashing and JWT session tokens
//! - **Server**: axum REST API tying the layers together
//!
//! # Example
//!
//! ```
//! use kinarow::game::{Game, GameStatus, PlayOutcome, Player};
//!
//! let mut game = Game::new(5, 4);
//! assert_eq!(game.current_player(), Player::X);
//! assert_eq!(game.play(2, 2), PlayOutcome::Continued);
//! assert_eq!(game.status(), GameStatus::InProgress);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
mod cli;
pub mod db;
pub mod game;
mod seed;
mod server;
mod service;
mod session;

pub use cli::{Cli, Command};
pub use seed::seed_guest_accounts;
pub use server::{ApiError, AppState, AuthUser, SessionView, UserView, router};
pub use service::{PlayerService, ServiceError};
pub use session::{GameSession, SeatedPlayer, SessionError, SessionManager};
