//! Domain layer - Core entities shared by every other layer.
//!
//! Pure data with no dependency on the repository, service or
//! controller modules.

mod user;

pub use user::{NewUser, User, UserId};
