use std::sync::Arc;

use crate::auth::errors::AuthError;
use crate::auth::errors::StoreError;
use crate::auth::models::EmailAddress;
use crate::auth::models::ResetToken;
use crate::auth::models::SessionId;
use crate::auth::models::User;
use crate::auth::models::UserFilter;
use crate::auth::models::UserId;
use crate::auth::models::UserUpdate;
use crate::auth::ports::PasswordScheme;
use crate::auth::ports::TokenSource;
use crate::auth::ports::UserStore;

/// Authentication and session-management service.
///
/// Orchestrates registration, login validation, session lifecycle, and the
/// password-reset flow on top of an abstract user store. Holds no state
/// between calls; every operation is at most one store read followed by at
/// most one store write.
///
/// The error surface is deliberately asymmetric. Read-style operations
/// (login validation, session resolution) treat "not found" as a normal
/// negative answer, because misses are expected on the auth-check hot path.
/// Action-style operations (registration, reset-token issuance and
/// consumption) raise typed failures, because their callers must react.
/// Session teardown discards failures entirely.
pub struct AuthService<S, P = credential::PasswordHasher, T = credential::TokenGenerator>
where
    S: UserStore,
    P: PasswordScheme,
    T: TokenSource,
{
    store: Arc<S>,
    scheme: P,
    tokens: T,
}

impl<S> AuthService<S>
where
    S: UserStore,
{
    /// Create a service with the production capabilities: Argon2id hashing
    /// and UUIDv4 tokens.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            scheme: credential::PasswordHasher::new(),
            tokens: credential::TokenGenerator::new(),
        }
    }
}

impl<S, P, T> AuthService<S, P, T>
where
    S: UserStore,
    P: PasswordScheme,
    T: TokenSource,
{
    /// Create a service with explicit hashing and token capabilities.
    ///
    /// Substituting deterministic fakes here is how the service is tested.
    pub fn with_capabilities(store: Arc<S>, scheme: P, tokens: T) -> Self {
        Self {
            store,
            scheme,
            tokens,
        }
    }

    /// Register a new user.
    ///
    /// # Arguments
    /// * `email` - Email to register under
    /// * `password` - Plaintext password, hashed before it reaches the store
    ///
    /// # Returns
    /// The persisted record, with null session and reset tokens
    ///
    /// # Errors
    /// * `AlreadyExists` - A record with this email is already registered
    /// * `Password` - Hashing failed
    /// * `Store` - Storage failure
    pub async fn register(&self, email: &EmailAddress, password: &str) -> Result<User, AuthError> {
        match self.store.find_user(&UserFilter::by_email(email)).await {
            Ok(_) => return Err(AuthError::AlreadyExists(email.as_str().to_string())),
            Err(StoreError::NotFound) => {}
            Err(e) => return Err(e.into()),
        }

        let digest = self.scheme.hash(password)?;
        let user = self.store.add_user(email, &digest).await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Check a login attempt.
    ///
    /// An unknown email is an ordinary failed login, not an error.
    ///
    /// # Returns
    /// True exactly when the email is registered and the password matches
    ///
    /// # Errors
    /// * `Password` - The stored digest is unusable
    /// * `Store` - Storage failure
    pub async fn validate_login(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<bool, AuthError> {
        let user = match self.store.find_user(&UserFilter::by_email(email)).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        Ok(self.scheme.verify(&user.password_hash, password)?)
    }

    /// Open a session for the user registered under `email`.
    ///
    /// Overwrites any session the user already had; the previous token stops
    /// resolving. An unknown email yields `None` without touching the store.
    ///
    /// # Returns
    /// The fresh session token, or `None` for an unknown email
    ///
    /// # Errors
    /// * `Store` - Storage failure
    pub async fn create_session(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<SessionId>, AuthError> {
        let user = match self.store.find_user(&UserFilter::by_email(email)).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let session_id = SessionId::new(self.tokens.new_token());
        self.store
            .update_user(
                &user.id,
                UserUpdate::new().with_session_id(Some(session_id.clone())),
            )
            .await?;

        tracing::debug!(user_id = %user.id, "session created");
        Ok(Some(session_id))
    }

    /// Resolve a session token back to its user.
    ///
    /// A missing or empty token short-circuits to `None` without a store
    /// round trip.
    ///
    /// # Errors
    /// * `Store` - Storage failure
    pub async fn resolve_session(
        &self,
        session_id: Option<&str>,
    ) -> Result<Option<User>, AuthError> {
        let session_id = match session_id {
            Some(token) if !token.is_empty() => token,
            _ => return Ok(None),
        };

        let filter = UserFilter::by_session_id(SessionId::new(session_id.to_string()));
        match self.store.find_user(&filter).await {
            Ok(user) => Ok(Some(user)),
            Err(StoreError::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Tear down the user's session, best effort.
    ///
    /// Never reports failure: an unknown id or a store fault is logged and
    /// discarded, so teardown is safe to call repeatedly.
    pub async fn destroy_session(&self, user_id: &UserId) {
        let update = UserUpdate::new().with_session_id(None);
        if let Err(e) = self.store.update_user(user_id, update).await {
            tracing::warn!(user_id = %user_id, error = %e, "session teardown ignored store error");
        }
    }

    /// Issue a password-reset token for the user registered under `email`.
    ///
    /// Overwrites any outstanding reset token.
    ///
    /// # Errors
    /// * `UserNotFound` - No user registered under this email
    /// * `Store` - Storage failure
    pub async fn issue_reset_token(&self, email: &EmailAddress) -> Result<ResetToken, AuthError> {
        let user = match self.store.find_user(&UserFilter::by_email(email)).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => {
                return Err(AuthError::UserNotFound(email.as_str().to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let reset_token = ResetToken::new(self.tokens.new_token());
        self.store
            .update_user(
                &user.id,
                UserUpdate::new().with_reset_token(Some(reset_token.clone())),
            )
            .await?;

        Ok(reset_token)
    }

    /// Consume a reset token and set a new password.
    ///
    /// The new digest and the token clear land in a single store write, so
    /// the token cannot be replayed against a half-updated record.
    ///
    /// # Errors
    /// * `InvalidToken` - The token is unknown or was already consumed
    /// * `Password` - Hashing failed
    /// * `Store` - Storage failure
    pub async fn update_password(
        &self,
        reset_token: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let filter = UserFilter::by_reset_token(ResetToken::new(reset_token.to_string()));
        let user = match self.store.find_user(&filter).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => return Err(AuthError::InvalidToken),
            Err(e) => return Err(e.into()),
        };

        let digest = self.scheme.hash(new_password)?;
        self.store
            .update_user(
                &user.id,
                UserUpdate::new()
                    .with_password_hash(digest)
                    .with_reset_token(None),
            )
            .await?;

        tracing::info!(user_id = %user.id, "password updated via reset token");
        Ok(())
    }
}
