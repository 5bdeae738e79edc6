//! Database persistence layer for user accounts and game records.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::DbError;
pub use models::{GameRecord, NewGameRecord, NewUser, StatsSummary, User};
pub use repository::{GameRepository, MIGRATIONS};
