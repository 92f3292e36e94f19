//! User service - Handles user-related use cases.
//!
//! Every operation is a single delegation to the repository. Failures
//! propagate unmodified.

use async_trait::async_trait;
use std::sync::Arc;

use common::AppResult;

use crate::domain::{User, UserId};
use crate::repository::UserRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create and persist a new user
    async fn create_user(&self, username: String, email: String) -> AppResult<User>;

    /// Get user by ID (`None` when absent)
    async fn get_user_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// List all users
    async fn get_all_users(&self) -> AppResult<Vec<User>>;

    /// Delete user by ID
    async fn delete_user(&self, id: UserId) -> AppResult<()>;
}

/// Concrete implementation of UserService using repository.
pub struct DefaultUserService {
    repo: Arc<dyn UserRepository>,
}

impl DefaultUserService {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for DefaultUserService {
    async fn create_user(&self, username: String, email: String) -> AppResult<User> {
        let user = self.repo.save(User::new(username, email)).await?;
        tracing::info!(user_id = ?user.id(), "User created");
        Ok(user)
    }

    async fn get_user_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        self.repo.find_by_id(id).await
    }

    async fn get_all_users(&self) -> AppResult<Vec<User>> {
        self.repo.find_all().await
    }

    async fn delete_user(&self, id: UserId) -> AppResult<()> {
        self.repo.delete_by_id(id).await
    }
}
