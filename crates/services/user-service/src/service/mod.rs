//! Service layer - User use cases.
//!
//! Services depend on the repository abstraction, never on a concrete
//! store, and are consumed only by the controller layer.

mod user_service;

pub use user_service::{DefaultUserService, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
