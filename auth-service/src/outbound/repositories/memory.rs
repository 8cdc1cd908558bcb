use std::sync::PoisonError;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::auth::errors::StoreError;
use crate::auth::models::EmailAddress;
use crate::auth::models::User;
use crate::auth::models::UserFilter;
use crate::auth::models::UserId;
use crate::auth::models::UserUpdate;
use crate::auth::ports::UserStore;

/// In-memory UserStore backed by an insertion-ordered list.
///
/// Writes go through one lock, which gives the serialization the core
/// expects from its store. When a filter matches several records the
/// earliest created one wins, so multi-match lookups are deterministic.
///
/// Intended for tests and embedders that do not need durability.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.users.read().map(|users| users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<G>(_: PoisonError<G>) -> StoreError {
    StoreError::Backend("user store lock poisoned".to_string())
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_user(&self, filter: &UserFilter) -> Result<User, StoreError> {
        let users = self.users.read().map_err(poisoned)?;
        users
            .iter()
            .find(|user| filter.matches(user))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn add_user(
        &self,
        email: &EmailAddress,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let user = User {
            id: UserId::new(),
            email: email.clone(),
            password_hash: password_hash.to_string(),
            session_id: None,
            reset_token: None,
            created_at: Utc::now(),
        };

        let mut users = self.users.write().map_err(poisoned)?;
        users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: &UserId, update: UserUpdate) -> Result<(), StoreError> {
        let mut users = self.users.write().map_err(poisoned)?;
        let user = users
            .iter_mut()
            .find(|user| user.id == *id)
            .ok_or(StoreError::NotFound)?;

        update.apply(user);
        Ok(())
    }
}
