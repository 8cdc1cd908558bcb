use credential::PasswordError;
use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Errors surfaced by a UserStore implementation.
///
/// `NotFound` is the only miss the core reacts to; anything else is treated
/// as a backend fault and propagated as-is. Field validity cannot fail at
/// runtime: updates are typed, so the unrecognized-field case of an untyped
/// store API has no representation here.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no user record matched the filter")]
    NotFound,

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Top-level error for authentication operations.
///
/// Only action-style operations produce the first three variants. Read-style
/// lookups (login validation, session resolution) degrade to `Ok(false)` /
/// `Ok(None)` instead of raising, and session teardown never surfaces an
/// error at all.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("user {0} already exists")]
    AlreadyExists(String),

    #[error("no user registered for {0}")]
    UserNotFound(String),

    #[error("reset token is invalid or already consumed")]
    InvalidToken,

    #[error("password capability error: {0}")]
    Password(#[from] PasswordError),

    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}
