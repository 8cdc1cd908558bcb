use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::auth::errors::EmailError;

/// User record aggregate.
///
/// Created by registration and mutated in place by the session and
/// password-reset operations; never deleted by this core.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub session_id: Option<SessionId>,
    pub reset_token: Option<ResetToken>,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address value type
///
/// Validates email format using an RFC 5322 compliant parser. The store
/// layer does not enforce uniqueness; registration does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque session token, stored server-side as proof of a prior successful
/// authentication. Deliberately has no `Display`: bearer tokens must not end
/// up in log lines by accident.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Opaque single-use token authorizing exactly one password change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResetToken(String);

impl ResetToken {
    pub fn new(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Exact-match lookup filter over one or more user record fields.
///
/// All populated fields must match. An empty filter matches no record.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub id: Option<UserId>,
    pub email: Option<EmailAddress>,
    pub session_id: Option<SessionId>,
    pub reset_token: Option<ResetToken>,
}

impl UserFilter {
    pub fn by_id(id: UserId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn by_email(email: &EmailAddress) -> Self {
        Self {
            email: Some(email.clone()),
            ..Self::default()
        }
    }

    pub fn by_session_id(session_id: SessionId) -> Self {
        Self {
            session_id: Some(session_id),
            ..Self::default()
        }
    }

    pub fn by_reset_token(reset_token: ResetToken) -> Self {
        Self {
            reset_token: Some(reset_token),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.email.is_none()
            && self.session_id.is_none()
            && self.reset_token.is_none()
    }

    /// Check whether a record satisfies every populated field of the filter.
    ///
    /// Matching is exact equality; there is no partial matching.
    pub fn matches(&self, user: &User) -> bool {
        if self.is_empty() {
            return false;
        }

        self.id.map_or(true, |id| id == user.id)
            && self.email.as_ref().map_or(true, |e| *e == user.email)
            && self
                .session_id
                .as_ref()
                .map_or(true, |s| user.session_id.as_ref() == Some(s))
            && self
                .reset_token
                .as_ref()
                .map_or(true, |t| user.reset_token.as_ref() == Some(t))
    }
}

/// Partial update of a user record.
///
/// Only populated fields are touched. A store must apply all populated
/// fields in one write, so a password change and its reset-token clear land
/// together or not at all.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub password_hash: Option<String>,
    pub session_id: Option<Option<SessionId>>,
    pub reset_token: Option<Option<ResetToken>>,
}

impl UserUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_password_hash(mut self, digest: String) -> Self {
        self.password_hash = Some(digest);
        self
    }

    pub fn with_session_id(mut self, session_id: Option<SessionId>) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn with_reset_token(mut self, reset_token: Option<ResetToken>) -> Self {
        self.reset_token = Some(reset_token);
        self
    }

    /// Apply the populated fields to a record.
    ///
    /// Callers hold whatever lock makes this atomic for their store.
    pub fn apply(&self, user: &mut User) {
        if let Some(digest) = &self.password_hash {
            user.password_hash = digest.clone();
        }
        if let Some(session_id) = &self.session_id {
            user.session_id = session_id.clone();
        }
        if let Some(reset_token) = &self.reset_token {
            user.reset_token = reset_token.clone();
        }
    }
}
