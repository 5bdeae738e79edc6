//! Database error types.

use derive_more::{Display, Error};

/// Database error with caller location tracking, split by failure kind so
/// callers can react to constraint violations without string matching.
#[derive(Debug, Clone, Display, Error)]
pub enum DbError {
    /// Opening a connection failed.
    #[display("Connection failed: {message} at {file}:{line}")]
    Connection {
        /// Error message.
        message: String,
        /// Source file where the error was raised.
        file: &'static str,
        /// Line number where the error was raised.
        line: u32,
    },
    /// A schema migration failed to apply.
    #[display("Migration failed: {message} at {file}:{line}")]
    Migration {
        /// Error message.
        message: String,
        /// Source file where the error was raised.
        file: &'static str,
        /// Line number where the error was raised.
        line: u32,
    },
    /// An insert or update hit a unique constraint.
    #[display("Unique constraint violated: {message} at {file}:{line}")]
    UniqueViolation {
        /// Error message.
        message: String,
        /// Source file where the error was raised.
        file: &'static str,
        /// Line number where the error was raised.
        line: u32,
    },
    /// Any other query failure.
    #[display("Query failed: {message} at {file}:{line}")]
    Query {
        /// Error message.
        message: String,
        /// Source file where the error was raised.
        file: &'static str,
        /// Line number where the error was raised.
        line: u32,
    },
}

impl DbError {
    /// Creates a connection error with caller location tracking.
    #[track_caller]
    pub fn connection(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self::Connection {
            message: message.into(),
            file: loc.file(),
            line: loc.line(),
        }
    }

    /// Creates a migration error with caller location tracking.
    #[track_caller]
    pub fn migration(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self::Migration {
            message: message.into(),
            file: loc.file(),
            line: loc.line(),
        }
    }

    /// Creates a unique-constraint error with caller location tracking.
    #[track_caller]
    pub fn unique_violation(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self::UniqueViolation {
            message: message.into(),
            file: loc.file(),
            line: loc.line(),
        }
    }

    /// Creates a query error with caller location tracking.
    #[track_caller]
    pub fn query(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self::Query {
            message: message.into(),
            file: loc.file(),
            line: loc.line(),
        }
    }

    /// Whether this error is a unique-constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};
        match err {
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::unique_violation(info.message().to_string())
            }
            other => Self::query(format!("Diesel error: {}", other)),
        }
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::connection(err.to_string())
    }
}
