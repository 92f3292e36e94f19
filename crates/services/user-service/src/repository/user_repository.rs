//! User repository contract and its in-memory implementation.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{User, UserId};
use common::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Lookups signal absence with `None`; only storage failures are errors.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a user, assigning an identity when it has none
    async fn save(&self, user: User) -> AppResult<User>;

    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// List all users
    async fn find_all(&self) -> AppResult<Vec<User>>;

    /// Delete user by ID (no-op when the user does not exist)
    async fn delete_by_id(&self, id: UserId) -> AppResult<()>;
}

/// Process-local user store.
///
/// Identities come from a sequence starting at 1 and are never reused,
/// even after a delete.
pub struct InMemoryUserRepository {
    users: RwLock<BTreeMap<UserId, User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            users: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn next_id(&self) -> UserId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: User) -> AppResult<User> {
        let id = match user.id() {
            Some(id) => id,
            None => self.next_id(),
        };
        let user = user.with_id(id);

        self.users.write().await.insert(id, user.clone());
        tracing::debug!(user_id = id, "User saved");

        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn delete_by_id(&self, id: UserId) -> AppResult<()> {
        if self.users.write().await.remove(&id).is_some() {
            tracing::debug!(user_id = id, "User deleted");
        }
        Ok(())
    }
}
