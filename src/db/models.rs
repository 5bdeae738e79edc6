//! Database models and aggregated statistics.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema;

/// User account database model.
///
/// Guest accounts are pre-seeded rows with `is_guest` set; they are persisted
/// and aggregated exactly like registered users.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::users)]
pub struct User {
    id: i32,
    username: String,
    nickname: String,
    password_hash: String,
    is_guest: bool,
    created_at: NaiveDateTime,
}

/// Insertable user model for creating new accounts.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::users)]
pub struct NewUser {
    username: String,
    nickname: String,
    password_hash: String,
    is_guest: bool,
}

/// Finished game database model.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters, Serialize)]
#[diesel(table_name = schema::games)]
pub struct GameRecord {
    id: i32,
    board_size: i32,
    win_length: i32,
    is_win: bool,
    moves: i32,
    duration_seconds: Option<i32>,
    winner_id: Option<i32>,
    player_x_id: i32,
    player_o_id: i32,
    created_at: NaiveDateTime,
}

/// Insertable game model for recording finished games.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::games)]
pub struct NewGameRecord {
    board_size: i32,
    win_length: i32,
    is_win: bool,
    moves: i32,
    duration_seconds: Option<i32>,
    winner_id: Option<i32>,
    player_x_id: i32,
    player_o_id: i32,
}

/// Aggregated win/loss/draw statistics for one user.
#[derive(Debug, Clone, PartialEq, Getters, Serialize)]
pub struct StatsSummary {
    total_games: i32,
    wins: i32,
    losses: i32,
    draws: i32,
    win_rate: f64,
}

impl StatsSummary {
    /// Creates a summary, deriving the win rate as a percentage rounded to
    /// two decimal places. Zero games gives a 0.0 rate.
    pub fn new(total_games: i32, wins: i32, losses: i32, draws: i32) -> Self {
        let win_rate = if total_games == 0 {
            0.0
        } else {
            ((wins as f64 / total_games as f64) * 10_000.0).round() / 100.0
        };
        Self {
            total_games,
            wins,
            losses,
            draws,
            win_rate,
        }
    }

    /// A summary for a user with no recorded games.
    pub fn empty() -> Self {
        Self::new(0, 0, 0, 0)
    }
}
