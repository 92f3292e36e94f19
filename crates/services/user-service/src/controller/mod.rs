//! Controller layer - the process boundary.
//!
//! Exposes the user use cases as plain methods and as HTTP routes.
//! Nothing else in the crate may depend on this module.

mod user_controller;

pub use user_controller::{routes, UserController};
