//! Database repository for user accounts and game records.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{DbError, GameRecord, NewGameRecord, NewUser, StatsSummary, User, schema};

/// Embedded schema migrations, applied at startup and in test setup.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for user and game operations.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository connected to the database at the given path.
    ///
    /// Use `":memory:"` for an in-memory database (useful for tests).
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Self {
        info!(path = %db_path, "Creating GameRepository");
        Self { db_path }
    }

    /// Establishes a database connection.
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::connection(format!("'{}': {}", self.db_path, e)))
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::migration(e.to_string()))?;
        info!("Migrations up to date");
        Ok(())
    }

    /// Creates a new user account.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the username is already taken or a database
    /// error occurs.
    #[instrument(skip(self, user), fields(username = %user.username()))]
    pub fn create_user(&self, user: NewUser) -> Result<User, DbError> {
        debug!("Creating user");
        let mut conn = self.connection()?;

        let user = diesel::insert_into(schema::users::table)
            .values(&user)
            .returning(User::as_returning())
            .get_result(&mut conn)?;

        info!(user_id = user.id(), username = %user.username(), "User created");
        Ok(user)
    }

    /// Gets a user by username. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        debug!(username = %username, "Looking up user by username");
        let mut conn = self.connection()?;

        let user = schema::users::table
            .filter(schema::users::username.eq(username))
            .first::<User>(&mut conn)
            .optional()?;

        Ok(user)
    }

    /// Gets a user by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_user_by_id(&self, user_id: i32) -> Result<Option<User>, DbError> {
        debug!(user_id, "Looking up user by id");
        let mut conn = self.connection()?;

        let user = schema::users::table
            .find(user_id)
            .first::<User>(&mut conn)
            .optional()?;

        Ok(user)
    }

    /// Lists all guest accounts, ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_guest_accounts(&self) -> Result<Vec<User>, DbError> {
        debug!("Listing guest accounts");
        let mut conn = self.connection()?;

        let guests = schema::users::table
            .filter(schema::users::is_guest.eq(true))
            .order(schema::users::created_at.asc())
            .load::<User>(&mut conn)?;

        info!(count = guests.len(), "Guest accounts loaded");
        Ok(guests)
    }

    /// Records a finished game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(
        skip(self, record),
        fields(
            player_x_id = record.player_x_id(),
            player_o_id = record.player_o_id(),
            winner_id = ?record.winner_id(),
        )
    )]
    pub fn record_game(&self, record: NewGameRecord) -> Result<GameRecord, DbError> {
        debug!("Recording finished game");
        let mut conn = self.connection()?;

        let game = diesel::insert_into(schema::games::table)
            .values(&record)
            .returning(GameRecord::as_returning())
            .get_result(&mut conn)?;

        info!(
            game_id = game.id(),
            moves = game.moves(),
            is_win = game.is_win(),
            "Game recorded"
        );
        Ok(game)
    }

    /// Gets all games a user played in either seat, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn games_for_player(&self, user_id: i32) -> Result<Vec<GameRecord>, DbError> {
        debug!(user_id, "Loading games for player");
        let mut conn = self.connection()?;

        let games = schema::games::table
            .filter(
                schema::games::player_x_id
                    .eq(user_id)
                    .or(schema::games::player_o_id.eq(user_id)),
            )
            .order(schema::games::created_at.desc())
            .load::<GameRecord>(&mut conn)?;

        info!(user_id, count = games.len(), "Player games loaded");
        Ok(games)
    }

    /// Computes aggregated win/loss/draw counts for a user.
    ///
    /// Wins are games where `winner_id` matches the user; draws are games
    /// with no winner and `is_win` false; losses are the remainder. Guest
    /// and registered accounts are attributed identically, by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn aggregated_stats(&self, user_id: i32) -> Result<StatsSummary, DbError> {
        debug!(user_id, "Computing aggregated stats");
        let games = self.games_for_player(user_id)?;

        let mut wins = 0;
        let mut draws = 0;
        for game in &games {
            if *game.winner_id() == Some(user_id) {
                wins += 1;
            } else if game.winner_id().is_none() && !game.is_win() {
                draws += 1;
            }
        }

        let total = games.len() as i32;
        let losses = total - wins - draws;
        let summary = StatsSummary::new(total, wins, losses, draws);

        info!(
            user_id,
            total,
            wins,
            losses,
            draws,
            win_rate = %format!("{:.2}%", summary.win_rate()),
            "Aggregated stats computed"
        );

        Ok(summary)
    }
}
