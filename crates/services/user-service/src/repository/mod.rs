//! Repository layer for data access.

mod user_repository;

pub use user_repository::{InMemoryUserRepository, UserRepository};

// Export mock for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
