//! Result and error types for the core library

use thiserror::Error;

use crate::ports::http::NetworkError;

/// Core library error type
///
/// "Not found" on reads is never an error: lookups return `Ok(None)`.
/// `NotFound` is only raised by writes that target a missing row.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(String),

    /// A storage-level constraint (primary key, unique) rejected a write
    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A stored row did not have the shape the mapper expected
    #[error("Malformed row: {0}")]
    MalformedRow(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a malformed row error
    pub fn malformed_row(msg: impl Into<String>) -> Self {
        Self::MalformedRow(msg.into())
    }

    /// Whether this error came from a uniqueness/primary key violation
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Constraint(_) | Self::AlreadyExists(_))
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::validation("bad input");
        assert_eq!(err.to_string(), "Validation error: bad input");

        let err = Error::not_found("account a1");
        assert_eq!(err.to_string(), "Not found: account a1");
    }

    #[test]
    fn test_is_conflict() {
        assert!(Error::Constraint("dup".into()).is_conflict());
        assert!(Error::AlreadyExists("dup".into()).is_conflict());
        assert!(!Error::database("io").is_conflict());
    }

    #[test]
    fn test_network_error_is_transparent() {
        let err: Error = NetworkError::Timeout("GET https://example.com".into()).into();
        assert_eq!(err.to_string(), "Timeout: GET https://example.com");
    }
}
