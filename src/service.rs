//! Player account and statistics business logic.

use derive_more::{Display, Error, From};
use tracing::{debug, error, info, instrument};

use crate::auth::{self, AuthError};
use crate::db::{DbError, GameRecord, GameRepository, NewGameRecord, NewUser, StatsSummary, User};
use crate::game::{GameReport, Player};

/// Longest allowed nickname.
const MAX_NICKNAME_LEN: usize = 15;

/// Error from player service operations.
#[derive(Debug, Clone, Display, Error, From)]
pub enum ServiceError {
    /// Underlying database failure.
    #[display("{_0}")]
    #[from]
    Db(DbError),
    /// Authentication failure.
    #[display("{_0}")]
    #[from]
    Auth(AuthError),
    /// Username is already registered.
    #[display("Username already exists")]
    UsernameTaken,
    /// Nickname exceeds the allowed length.
    #[display("Nickname must be {} characters or less", MAX_NICKNAME_LEN)]
    NicknameTooLong,
    /// Referenced user does not exist.
    #[display("User not found")]
    UserNotFound,
    /// Guest login attempted against a non-guest account.
    #[display("Guest account not found")]
    GuestNotFound,
}

/// Service layer over [`GameRepository`] for account management, game
/// recording, and stats aggregation.
#[derive(Debug, Clone)]
pub struct PlayerService {
    repository: GameRepository,
}

impl PlayerService {
    /// Creates a new player service backed by the given repository.
    #[instrument(skip(repository))]
    pub fn new(repository: GameRepository) -> Self {
        info!("Creating PlayerService");
        Self { repository }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &GameRepository {
        &self.repository
    }

    /// Registers a new account with a hashed password.
    ///
    /// # Errors
    ///
    /// [`ServiceError::UsernameTaken`] on a duplicate username,
    /// [`ServiceError::NicknameTooLong`] when the nickname exceeds the
    /// limit, or a database/hashing error.
    #[instrument(skip(self, password))]
    pub fn register(
        &self,
        username: &str,
        password: &str,
        nickname: &str,
    ) -> Result<User, ServiceError> {
        if nickname.chars().count() > MAX_NICKNAME_LEN {
            return Err(ServiceError::NicknameTooLong);
        }

        // Uniqueness is enforced by the database constraint rather than a
        // pre-check, so two concurrent registrations cannot both pass.
        let password_hash = auth::hash_password(password)?;
        let user = self
            .repository
            .create_user(NewUser::new(
                username.to_string(),
                nickname.to_string(),
                password_hash,
                false,
            ))
            .map_err(|e| {
                if e.is_unique_violation() {
                    ServiceError::UsernameTaken
                } else {
                    ServiceError::Db(e)
                }
            })?;

        info!(user_id = user.id(), "Registered new account");
        Ok(user)
    }

    /// Authenticates a username/password pair.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] for an unknown username or a wrong
    /// password; the two cases are indistinguishable to the caller.
    #[instrument(skip(self, password))]
    pub fn login(&self, username: &str, password: &str) -> Result<User, ServiceError> {
        let user = self
            .repository
            .get_user_by_username(username)?
            .ok_or(ServiceError::Auth(AuthError::InvalidCredentials))?;

        auth::verify_password(password, user.password_hash())?;
        info!(user_id = user.id(), "Login successful");
        Ok(user)
    }

    /// Logs into a pre-seeded guest account by username, no password needed.
    ///
    /// # Errors
    ///
    /// [`ServiceError::GuestNotFound`] when the username is unknown or names
    /// a regular account.
    #[instrument(skip(self))]
    pub fn guest_login(&self, username: &str) -> Result<User, ServiceError> {
        let user = self
            .repository
            .get_user_by_username(username)?
            .filter(|u| *u.is_guest())
            .ok_or(ServiceError::GuestNotFound)?;

        info!(user_id = user.id(), "Guest login successful");
        Ok(user)
    }

    /// Lists the usernames of all seeded guest accounts.
    #[instrument(skip(self))]
    pub fn guest_accounts(&self) -> Result<Vec<String>, ServiceError> {
        let guests = self.repository.list_guest_accounts()?;
        Ok(guests.into_iter().map(|u| u.username().clone()).collect())
    }

    /// Looks up a user by id.
    ///
    /// # Errors
    ///
    /// [`ServiceError::UserNotFound`] when no such user exists.
    #[instrument(skip(self))]
    pub fn user_by_id(&self, user_id: i32) -> Result<User, ServiceError> {
        self.repository
            .get_user_by_id(user_id)?
            .ok_or(ServiceError::UserNotFound)
    }

    /// Records a finished game.
    ///
    /// # Errors
    ///
    /// Returns the underlying database error; callers on the gameplay path
    /// log and swallow it, since persistence failure never alters a
    /// terminal game state.
    #[instrument(skip(self, record))]
    pub fn save_game(&self, record: NewGameRecord) -> Result<GameRecord, ServiceError> {
        debug!("Saving finished game");
        Ok(self.repository.record_game(record)?)
    }

    /// Builds and records the game row for a finished session.
    ///
    /// The winner id is resolved from the winning mark; draws store no
    /// winner. Failure is logged here and reported to the caller, who is
    /// expected to swallow it.
    #[instrument(skip(self, report), fields(moves = report.moves()))]
    pub fn save_session_result(
        &self,
        report: &GameReport,
        player_x_id: i32,
        player_o_id: i32,
    ) -> Result<GameRecord, ServiceError> {
        let winner_id = report.status().winner().map(|mark| match mark {
            Player::X => player_x_id,
            Player::O => player_o_id,
        });
        let record = NewGameRecord::new(
            *report.board_size() as i32,
            *report.win_length() as i32,
            winner_id.is_some(),
            *report.moves() as i32,
            Some(i32::try_from(*report.duration_seconds()).unwrap_or(i32::MAX)),
            winner_id,
            player_x_id,
            player_o_id,
        );
        self.save_game(record).inspect_err(|e| {
            error!(error = %e, "Failed to persist finished game");
        })
    }

    /// Returns aggregated stats for a user.
    ///
    /// # Errors
    ///
    /// [`ServiceError::UserNotFound`] when no such user exists.
    #[instrument(skip(self))]
    pub fn stats(&self, user_id: i32) -> Result<StatsSummary, ServiceError> {
        self.user_by_id(user_id)?;
        Ok(self.repository.aggregated_stats(user_id)?)
    }

    /// Returns a user's game history, most recent first.
    #[instrument(skip(self))]
    pub fn history(&self, user_id: i32) -> Result<Vec<GameRecord>, ServiceError> {
        Ok(self.repository.games_for_player(user_id)?)
    }
}
