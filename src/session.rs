//! Multiplayer game session management.
//!
//! Each session wraps one [`Game`] and two seats. All mutation of a session
//! goes through the [`SessionManager`] lock, which serializes concurrent
//! move submissions from the two players.

use crate::game::{Game, PlayOutcome, Player};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// A player seated in a game session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatedPlayer {
    /// User id of the seated account.
    pub user_id: i32,
    /// Display name shown to the opponent.
    pub name: String,
    /// Which mark this player uses.
    pub mark: Player,
}

/// Error from session operations.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    /// No session with the given id.
    #[display("Session not found")]
    NotFound,
    /// A session with the given id already exists.
    #[display("Session already exists")]
    AlreadyExists,
    /// Both seats are taken.
    #[display("Session already has 2 players")]
    Full,
    /// The acting user is not seated in this session.
    #[display("Not a player in this session")]
    NotSeated,
    /// Moves are gated until both seats are filled.
    #[display("Waiting for both players to join")]
    NotReady,
    /// The acting player moved out of turn.
    #[display("Not your turn, waiting for player {_0}")]
    NotYourTurn(#[error(not(source))] Player),
}

/// A game session with two seats.
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Session id.
    pub id: SessionId,
    /// The game state machine.
    pub game: Game,
    /// Seat for player X.
    pub player_x: Option<SeatedPlayer>,
    /// Seat for player O.
    pub player_o: Option<SeatedPlayer>,
}

impl GameSession {
    /// Creates a new session with an empty board and both seats open.
    #[instrument]
    pub fn new(id: SessionId, size: usize, win_length: usize) -> Self {
        info!(session_id = %id, size, win_length, "Creating game session");
        Self {
            id,
            game: Game::new(size, win_length),
            player_x: None,
            player_o: None,
        }
    }

    /// Seats a user in the first open slot, returning the assigned mark.
    ///
    /// A user already seated keeps their existing mark, so a re-join after a
    /// client reload is harmless.
    ///
    /// # Errors
    ///
    /// [`SessionError::Full`] when both seats are taken by other users.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn seat_player(&mut self, user_id: i32, name: String) -> Result<Player, SessionError> {
        if let Some(existing) = self.seat_of(user_id) {
            debug!(user_id, mark = %existing.mark, "User already seated");
            return Ok(existing.mark);
        }
        if self.player_x.is_none() {
            info!(user_id, mark = "X", "Seating player as X");
            self.player_x = Some(SeatedPlayer {
                user_id,
                name,
                mark: Player::X,
            });
            Ok(Player::X)
        } else if self.player_o.is_none() {
            info!(user_id, mark = "O", "Seating player as O");
            self.player_o = Some(SeatedPlayer {
                user_id,
                name,
                mark: Player::O,
            });
            Ok(Player::O)
        } else {
            warn!(user_id, "Session already has 2 players");
            Err(SessionError::Full)
        }
    }

    /// Gets the seat occupied by the given user, if any.
    pub fn seat_of(&self, user_id: i32) -> Option<&SeatedPlayer> {
        [self.player_x.as_ref(), self.player_o.as_ref()]
            .into_iter()
            .flatten()
            .find(|p| p.user_id == user_id)
    }

    /// Whether both seats are filled, gating move acceptance.
    pub fn ready(&self) -> bool {
        self.player_x.is_some() && self.player_o.is_some()
    }

    /// Makes a move for the given user.
    ///
    /// Seat membership and turn order are validated here; occupancy and
    /// terminal-state checks belong to the engine, which ignores such moves
    /// idempotently ([`PlayOutcome::Ignored`]) rather than erroring.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotReady`] before both players have joined,
    /// [`SessionError::NotSeated`] for an unknown user, or
    /// [`SessionError::NotYourTurn`] on an out-of-turn submission.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn make_move(
        &mut self,
        user_id: i32,
        row: usize,
        col: usize,
    ) -> Result<PlayOutcome, SessionError> {
        if !self.ready() {
            debug!("Move rejected: waiting for players");
            return Err(SessionError::NotReady);
        }
        let seat = self.seat_of(user_id).ok_or_else(|| {
            warn!(user_id, "Unknown user attempted move");
            SessionError::NotSeated
        })?;

        // Terminal games ignore every submission, including out-of-turn
        // ones, so a stale client retrying is a no-op rather than an error.
        if self.game.status().is_terminal() {
            debug!("Move ignored: game already over");
            return Ok(PlayOutcome::Ignored);
        }

        if seat.mark != self.game.current_player() {
            warn!(
                user_id,
                mark = %seat.mark,
                expected = %self.game.current_player(),
                "Player tried to move out of turn"
            );
            return Err(SessionError::NotYourTurn(self.game.current_player()));
        }

        let outcome = self.game.play(row, col);
        info!(user_id, row, col, status = ?self.game.status(), "Move processed");
        Ok(outcome)
    }

    /// Resets the session's game, optionally resizing the board or changing
    /// the win length. Seats are kept.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn reset(&mut self, size: Option<usize>, win_length: Option<usize>) {
        self.game.reset(size, win_length);
    }
}

/// Manages all game sessions behind one lock per manager.
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, GameSession>>>,
}

impl SessionManager {
    /// Creates a new session manager.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session manager");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Creates a new game session.
    ///
    /// # Errors
    ///
    /// [`SessionError::AlreadyExists`] when the id is taken.
    #[instrument(skip(self))]
    pub fn create_session(
        &self,
        id: SessionId,
        size: usize,
        win_length: usize,
    ) -> Result<(), SessionError> {
        let mut sessions = self.lock();
        if sessions.contains_key(&id) {
            warn!(session_id = %id, "Session already exists");
            return Err(SessionError::AlreadyExists);
        }
        sessions.insert(id.clone(), GameSession::new(id, size, win_length));
        Ok(())
    }

    /// Runs `f` against the named session while holding the manager lock,
    /// serializing concurrent submissions for the same game.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotFound`] when no such session exists; otherwise
    /// whatever `f` returns.
    pub fn with_session<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut GameSession) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let mut sessions = self.lock();
        let session = sessions.get_mut(id).ok_or_else(|| {
            debug!(session_id = id, "Session not found");
            SessionError::NotFound
        })?;
        f(session)
    }

    /// Returns a snapshot of a session.
    #[instrument(skip(self))]
    pub fn get_session(&self, id: &str) -> Option<GameSession> {
        self.lock().get(id).cloned()
    }

    /// Lists all active session ids.
    #[instrument(skip(self))]
    pub fn list_sessions(&self) -> Vec<SessionId> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SessionId, GameSession>> {
        // Lock poisoning only happens if a holder panicked; the map itself
        // is always consistent, so continue with the inner value.
        match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
