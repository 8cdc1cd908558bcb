use async_trait::async_trait;
use credential::PasswordError;

use crate::auth::errors::StoreError;
use crate::auth::models::EmailAddress;
use crate::auth::models::User;
use crate::auth::models::UserFilter;
use crate::auth::models::UserId;
use crate::auth::models::UserUpdate;

/// Persistence port for user records.
///
/// The core owns no cache: every operation re-queries the store, so two
/// service instances observe a consistent view exactly when the store
/// serializes conflicting writes to the same record.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Look up a single user record by exact-match filter.
    ///
    /// When more than one record matches, implementations must return the
    /// same record deterministically; the convention in this workspace is
    /// "earliest created".
    ///
    /// # Arguments
    /// * `filter` - Populated fields that must all match
    ///
    /// # Returns
    /// The first matching user record
    ///
    /// # Errors
    /// * `NotFound` - No record matched
    /// * `Backend` - Storage failure
    async fn find_user(&self, filter: &UserFilter) -> Result<User, StoreError>;

    /// Persist a new user record and assign its identity.
    ///
    /// The store does not enforce email uniqueness; registration checks for
    /// duplicates before calling this.
    ///
    /// # Arguments
    /// * `email` - Validated email address
    /// * `password_hash` - Opaque digest, stored verbatim
    ///
    /// # Returns
    /// The created record with null session and reset tokens
    ///
    /// # Errors
    /// * `Backend` - Storage failure
    async fn add_user(&self, email: &EmailAddress, password_hash: &str)
        -> Result<User, StoreError>;

    /// Apply a partial update to the record with the given id.
    ///
    /// All populated fields of the update land in one write.
    ///
    /// # Arguments
    /// * `id` - Identity of the record to update
    /// * `update` - Fields to write
    ///
    /// # Errors
    /// * `NotFound` - No record with this id
    /// * `Backend` - Storage failure
    async fn update_user(&self, id: &UserId, update: UserUpdate) -> Result<(), StoreError>;
}

/// Password hashing capability consumed by the service.
///
/// The digest is opaque; the scheme's only contract is that `verify` accepts
/// what `hash` produced.
pub trait PasswordScheme: Send + Sync + 'static {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;

    /// `Ok(false)` means a wrong password; `Err` means the digest itself is
    /// unusable.
    fn verify(&self, digest: &str, plaintext: &str) -> Result<bool, PasswordError>;
}

impl PasswordScheme for credential::PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        credential::PasswordHasher::hash(self, plaintext)
    }

    fn verify(&self, digest: &str, plaintext: &str) -> Result<bool, PasswordError> {
        credential::PasswordHasher::verify(self, digest, plaintext)
    }
}

/// Source of fresh opaque tokens for sessions and password resets.
pub trait TokenSource: Send + Sync + 'static {
    fn new_token(&self) -> String;
}

impl TokenSource for credential::TokenGenerator {
    fn new_token(&self) -> String {
        credential::TokenGenerator::new_token(self)
    }
}
