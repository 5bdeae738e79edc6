//! REST API over the game core and persistence layer.

use axum::Router;
use axum::extract::{FromRef, FromRequestParts, Json, Path, State};
use axum::http::{StatusCode, request::Parts};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info, instrument, warn};

use crate::auth::{AuthError, Claims, JwtKeys};
use crate::db::User;
use crate::game::{
    Cell, GameStatus, MAX_SIZE, MIN_SIZE, MIN_WIN_LENGTH, PlayOutcome, Player, win_length_range,
};
use crate::service::{PlayerService, ServiceError};
use crate::session::{SeatedPlayer, SessionError, SessionManager};

/// Shared application state.
#[derive(Clone, FromRef)]
pub struct AppState {
    /// Account and stats service.
    pub players: PlayerService,
    /// Active game sessions.
    pub sessions: SessionManager,
    /// Token keys.
    pub keys: JwtKeys,
}

impl AppState {
    /// Creates application state from its collaborators.
    pub fn new(players: PlayerService, sessions: SessionManager, keys: JwtKeys) -> Self {
        Self {
            players,
            sessions,
            keys,
        }
    }
}

/// Builds the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/guest-accounts", get(guest_accounts))
        .route("/api/guest-login", post(guest_login))
        .route("/api/games", post(save_game))
        .route("/api/profile", get(profile))
        .route("/api/users/{id}/stats", get(user_stats))
        .route("/api/users/{id}/games", get(user_games))
        .route("/api/sessions", get(list_sessions).post(create_session))
        .route("/api/sessions/{id}", get(get_session))
        .route("/api/sessions/{id}/join", post(join_session))
        .route("/api/sessions/{id}/moves", post(make_move))
        .route("/api/sessions/{id}/reset", post(reset_session))
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────
//  Error mapping
// ─────────────────────────────────────────────────────────────

/// API error response carrying an HTTP status and a message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let status = match &err {
            ServiceError::UsernameTaken => StatusCode::CONFLICT,
            ServiceError::NicknameTooLong => StatusCode::BAD_REQUEST,
            ServiceError::UserNotFound | ServiceError::GuestNotFound => StatusCode::NOT_FOUND,
            ServiceError::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            ServiceError::Auth(AuthError::InvalidToken) => StatusCode::UNAUTHORIZED,
            ServiceError::Auth(AuthError::Hash(_)) | ServiceError::Db(_) => {
                error!(error = %err, "Internal service error");
                return Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                );
            }
        };
        Self::new(status, err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Hash(_) => {
                error!(error = %err, "Internal auth error");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            _ => Self::new(StatusCode::UNAUTHORIZED, err.to_string()),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        let status = match &err {
            SessionError::NotFound => StatusCode::NOT_FOUND,
            SessionError::AlreadyExists => StatusCode::CONFLICT,
            SessionError::Full | SessionError::NotSeated => StatusCode::FORBIDDEN,
            SessionError::NotReady | SessionError::NotYourTurn(_) => StatusCode::CONFLICT,
        };
        Self::new(status, err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────
//  Auth extractor
// ─────────────────────────────────────────────────────────────

/// Authenticated user, extracted from the `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct AuthUser(
    /// Verified token claims.
    pub Claims,
);

impl<S> FromRequestParts<S> for AuthUser
where
    JwtKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "Missing bearer token"))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "Missing bearer token"))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token)?;
        Ok(AuthUser(claims))
    }
}

// ─────────────────────────────────────────────────────────────
//  Wire types
// ─────────────────────────────────────────────────────────────

/// Public view of a user account.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    /// User id.
    pub id: i32,
    /// Login name.
    pub username: String,
    /// Display nickname.
    pub nickname: String,
    /// Whether this is a seeded guest account.
    pub is_guest: bool,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id(),
            username: user.username().clone(),
            nickname: user.nickname().clone(),
            is_guest: *user.is_guest(),
        }
    }
}

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Login name, unique.
    pub username: String,
    /// Plaintext password.
    pub password: String,
    /// Display nickname, at most 15 characters.
    pub nickname: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Guest login request body.
#[derive(Debug, Deserialize)]
pub struct GuestLoginRequest {
    /// Guest account username.
    pub username: String,
}

/// Authenticated response: user plus session token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// The account.
    pub user: UserView,
    /// Signed bearer token.
    pub token: String,
}

/// Direct game-save request body (§6 persistence sink contract).
#[derive(Debug, Deserialize)]
pub struct SaveGameRequest {
    /// Board dimension.
    pub board_size: i32,
    /// Win length in effect.
    pub win_length: i32,
    /// Whether the game ended with a winner.
    pub is_win: bool,
    /// Total moves played.
    pub moves: i32,
    /// Duration in seconds, when known.
    pub duration_seconds: Option<i32>,
    /// Winner's user id; absent on a draw.
    pub winner_id: Option<i32>,
    /// Player X's user id.
    pub player_x_id: i32,
    /// Player O's user id.
    pub player_o_id: i32,
}

/// Session creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Client-chosen session id.
    pub session_id: String,
    /// Board dimension; defaults to 3.
    pub board_size: Option<usize>,
    /// Win length; defaults to the board size cap.
    pub win_length: Option<usize>,
}

/// Move request body.
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    /// Row index, 0-based.
    pub row: usize,
    /// Column index, 0-based.
    pub col: usize,
}

/// Reset request body.
#[derive(Debug, Default, Deserialize)]
pub struct ResetRequest {
    /// New board dimension; defaults to the current one.
    pub board_size: Option<usize>,
    /// New win length; defaults to the current one, clamped to the board.
    pub win_length: Option<usize>,
}

/// Snapshot of a session for clients.
#[derive(Debug, Serialize)]
pub struct SessionView {
    /// Session id.
    pub session_id: String,
    /// Seated player X, if any.
    pub player_x: Option<SeatedPlayer>,
    /// Seated player O, if any.
    pub player_o: Option<SeatedPlayer>,
    /// Whose turn it is.
    pub current_player: Player,
    /// Game status.
    pub status: GameStatus,
    /// Moves played so far.
    pub move_count: usize,
    /// Board dimension.
    pub board_size: usize,
    /// Win length in effect.
    pub win_length: usize,
    /// Board cells as rows of cells.
    pub board: Vec<Vec<Cell>>,
}

impl SessionView {
    fn from_session(session: &crate::session::GameSession) -> Self {
        let board = session.game.board();
        let n = board.size();
        let rows = (0..n)
            .map(|r| (0..n).map(|c| board.get(r, c).unwrap_or(Cell::Empty)).collect())
            .collect();
        Self {
            session_id: session.id.clone(),
            player_x: session.player_x.clone(),
            player_o: session.player_o.clone(),
            current_player: session.game.current_player(),
            status: session.game.status(),
            move_count: session.game.move_count(),
            board_size: n,
            win_length: session.game.win_length(),
            board: rows,
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Handlers
// ─────────────────────────────────────────────────────────────

#[instrument]
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "timestamp": Utc::now().to_rfc3339() }))
}

#[instrument(skip(state, req), fields(username = %req.username))]
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    if req.username.is_empty() || req.password.is_empty() || req.nickname.is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Username, password, and nickname are required",
        ));
    }

    let user = state
        .players
        .register(&req.username, &req.password, &req.nickname)?;
    let token = state.keys.issue(&user)?;

    info!(user_id = user.id(), "User registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserView::from(&user),
            token,
        }),
    ))
}

#[instrument(skip(state, req), fields(username = %req.username))]
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = state.players.login(&req.username, &req.password)?;
    let token = state.keys.issue(&user)?;

    Ok(Json(AuthResponse {
        user: UserView::from(&user),
        token,
    }))
}

#[instrument(skip(state))]
async fn guest_accounts(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let guests = state.players.guest_accounts()?;
    Ok(Json(json!({ "guest_accounts": guests })))
}

#[instrument(skip(state, req), fields(username = %req.username))]
async fn guest_login(
    State(state): State<AppState>,
    Json(req): Json<GuestLoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = state.players.guest_login(&req.username)?;
    let token = state.keys.issue(&user)?;

    Ok(Json(AuthResponse {
        user: UserView::from(&user),
        token,
    }))
}

#[instrument(skip(state, req))]
async fn save_game(
    State(state): State<AppState>,
    Json(req): Json<SaveGameRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    // Both seats must reference real accounts; winner attribution is by id.
    state.players.user_by_id(req.player_x_id)?;
    state.players.user_by_id(req.player_o_id)?;

    let record = state.players.save_game(crate::db::NewGameRecord::new(
        req.board_size,
        req.win_length,
        req.is_win,
        req.moves,
        req.duration_seconds,
        req.winner_id,
        req.player_x_id,
        req.player_o_id,
    ))?;

    Ok((StatusCode::CREATED, Json(json!({ "game": record }))))
}

#[instrument(skip(state, user), fields(user_id = user.0.sub))]
async fn profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let account = state.players.user_by_id(user.0.sub)?;
    let stats = state.players.stats(user.0.sub)?;

    Ok(Json(json!({
        "user": UserView::from(&account),
        "stats": stats,
    })))
}

#[instrument(skip(state))]
async fn user_stats(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let stats = state.players.stats(user_id)?;
    Ok(Json(json!({ "stats": stats })))
}

#[instrument(skip(state))]
async fn user_games(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.players.user_by_id(user_id)?;
    let games = state.players.history(user_id)?;
    Ok(Json(json!({ "games": games })))
}

#[instrument(skip(state, req), fields(session_id = %req.session_id))]
async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let size = req
        .board_size
        .unwrap_or(MIN_SIZE)
        .clamp(MIN_SIZE, MAX_SIZE);
    // Requested win lengths are clamped into the selectable range for the
    // chosen board before they reach the engine.
    let range = win_length_range(size);
    let win_length = req
        .win_length
        .unwrap_or(MIN_WIN_LENGTH)
        .clamp(*range.start(), *range.end());
    state
        .sessions
        .create_session(req.session_id.clone(), size, win_length)?;

    let session = state
        .sessions
        .get_session(&req.session_id)
        .ok_or(SessionError::NotFound)?;
    Ok((StatusCode::CREATED, Json(SessionView::from_session(&session))))
}

#[instrument(skip(state))]
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let ids = state.sessions.list_sessions();
    Json(json!({ "sessions": ids }))
}

#[instrument(skip(state))]
async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state
        .sessions
        .get_session(&session_id)
        .ok_or(SessionError::NotFound)?;
    Ok(Json(SessionView::from_session(&session)))
}

#[instrument(skip(state, user), fields(session_id = %session_id, user_id = user.0.sub))]
async fn join_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    user: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mark = state.sessions.with_session(&session_id, |session| {
        session.seat_player(user.0.sub, user.0.nickname.clone())
    })?;
    Ok(Json(json!({ "mark": mark })))
}

#[instrument(skip(state, user, req), fields(session_id = %session_id, user_id = user.0.sub))]
async fn make_move(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    user: AuthUser,
    Json(req): Json<MoveRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (outcome, view, seats) = state.sessions.with_session(&session_id, |session| {
        let outcome = session.make_move(user.0.sub, req.row, req.col)?;
        let seats = session
            .player_x
            .as_ref()
            .zip(session.player_o.as_ref())
            .map(|(x, o)| (x.user_id, o.user_id));
        Ok((outcome, SessionView::from_session(session), seats))
    })?;

    // First terminal transition: forward the report to the persistence
    // sink. Failure is logged and swallowed; the finished game stands.
    if let PlayOutcome::Finished(report) = &outcome {
        match seats {
            Some((x_id, o_id)) => {
                if state
                    .players
                    .save_session_result(report, x_id, o_id)
                    .is_err()
                {
                    warn!(session_id = %session_id, "Game finished but result was not persisted");
                }
            }
            None => debug!("Finished game had unseated players, nothing to persist"),
        }
    }

    let accepted = !matches!(outcome, PlayOutcome::Ignored);
    Ok(Json(json!({ "accepted": accepted, "session": view })))
}

#[instrument(skip(state, user, req), fields(session_id = %session_id, user_id = user.0.sub))]
async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    user: AuthUser,
    Json(req): Json<ResetRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let view = state.sessions.with_session(&session_id, |session| {
        if session.seat_of(user.0.sub).is_none() {
            return Err(SessionError::NotSeated);
        }
        let size = req
            .board_size
            .unwrap_or(session.game.board().size())
            .clamp(MIN_SIZE, MAX_SIZE);
        let range = win_length_range(size);
        let win_length = req
            .win_length
            .unwrap_or(session.game.win_length())
            .clamp(*range.start(), *range.end());
        session.reset(Some(size), Some(win_length));
        Ok(SessionView::from_session(session))
    })?;
    Ok(Json(view))
}
