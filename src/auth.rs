//! Identity: password hashing and JWT session tokens.

use chrono::Utc;
use derive_more::{Display, Error};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::db::User;

/// Token lifetime for registered users (24 hours).
const TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;
/// Token lifetime for guest sessions (7 days).
const GUEST_TOKEN_LIFETIME_SECS: i64 = 7 * 24 * 60 * 60;

/// bcrypt work factor.
const BCRYPT_COST: u32 = 10;

/// Authentication error.
#[derive(Debug, Clone, Display, Error)]
pub enum AuthError {
    /// Password hashing or verification failed internally.
    #[display("Password hashing failed: {_0}")]
    Hash(#[error(not(source))] String),
    /// The presented credentials are wrong.
    #[display("Invalid credentials")]
    InvalidCredentials,
    /// Token is missing, malformed, or expired.
    #[display("Invalid token")]
    InvalidToken,
}

/// Claims carried in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i32,
    /// Username at issue time.
    pub username: String,
    /// Display nickname at issue time.
    pub nickname: String,
    /// Whether this is a guest session.
    pub guest: bool,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

/// Signing and verification keys for session tokens.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys").finish_non_exhaustive()
    }
}

impl JwtKeys {
    /// Creates keys from a shared secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Creates keys from the `JWT_SECRET` environment variable, warning and
    /// falling back to a development default when unset.
    #[instrument]
    pub fn from_env() -> Self {
        match std::env::var("JWT_SECRET") {
            Ok(secret) => Self::new(secret.as_bytes()),
            Err(_) => {
                warn!("JWT_SECRET not set, using development fallback secret");
                Self::new(b"fallback-secret-change-in-production")
            }
        }
    }

    /// Issues a signed session token for the given user. Guest sessions
    /// carry a longer lifetime than registered ones.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] if signing fails.
    #[instrument(skip(self, user), fields(user_id = user.id(), guest = user.is_guest()))]
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let lifetime = if *user.is_guest() {
            GUEST_TOKEN_LIFETIME_SECS
        } else {
            TOKEN_LIFETIME_SECS
        };
        let claims = Claims {
            sub: *user.id(),
            username: user.username().clone(),
            nickname: user.nickname().clone(),
            guest: *user.is_guest(),
            exp: Utc::now().timestamp() + lifetime,
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|_| AuthError::InvalidToken)
    }

    /// Verifies a token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] on a malformed, forged, or
    /// expired token.
    #[instrument(skip(self, token))]
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}

/// Hashes a password for storage.
///
/// # Errors
///
/// Returns [`AuthError::Hash`] if bcrypt fails.
#[instrument(skip(password))]
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|e| AuthError::Hash(e.to_string()))
}

/// Verifies a password against a stored hash.
///
/// # Errors
///
/// Returns [`AuthError::InvalidCredentials`] on mismatch, or
/// [`AuthError::Hash`] if the stored hash is unreadable.
#[instrument(skip(password, hash))]
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let ok = bcrypt::verify(password, hash).map_err(|e| AuthError::Hash(e.to_string()))?;
    if ok {
        Ok(())
    } else {
        Err(AuthError::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("hunter2").expect("hash failed");
        assert!(verify_password("hunter2", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage_token() {
        let keys = JwtKeys::new(b"test-secret");
        assert!(matches!(
            keys.verify("not.a.token"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_forged_token_rejected() {
        let keys = JwtKeys::new(b"secret-a");
        let other = JwtKeys::new(b"secret-b");
        let claims = Claims {
            sub: 1,
            username: "alice".into(),
            nickname: "Alice".into(),
            guest: false,
            exp: Utc::now().timestamp() + 3600,
        };
        let token = jsonwebtoken::encode(&Header::default(), &claims, &keys.encoding)
            .expect("encode failed");
        assert!(keys.verify(&token).is_ok());
        assert!(other.verify(&token).is_err());
    }
}
