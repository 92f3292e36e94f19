//! User domain entity and related types.

use serde::{Deserialize, Serialize};

/// Identity assigned to a user by the persistence layer.
pub type UserId = i64;

/// User domain entity.
///
/// The identity is absent until the user has been saved; the repository
/// populates it exactly once through [`User::with_id`]. Only serialized:
/// nothing outside the crate can build a `User` that already has an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: Option<UserId>,
    username: String,
    email: String,
}

impl User {
    /// Create a user that has not been persisted yet.
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: email.into(),
        }
    }

    pub fn id(&self) -> Option<UserId> {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Check if the storage layer has assigned an identity
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Attach the identity assigned by the storage layer.
    ///
    /// An identity that is already present is kept.
    pub(crate) fn with_id(mut self, id: UserId) -> Self {
        if self.id.is_none() {
            self.id = Some(id);
        }
        self
    }
}

/// User creation payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Login name
    pub username: String,
    /// Contact email address
    pub email: String,
}

impl From<NewUser> for User {
    fn from(new_user: NewUser) -> Self {
        User::new(new_user.username, new_user.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_has_no_identity() {
        let user = User::new("alice", "alice@example.com");
        assert_eq!(user.id(), None);
        assert!(!user.is_persisted());
        assert_eq!(user.username(), "alice");
        assert_eq!(user.email(), "alice@example.com");
    }

    #[test]
    fn identity_is_assigned_once() {
        let user = User::new("alice", "alice@example.com").with_id(7);
        assert_eq!(user.id(), Some(7));

        let user = user.with_id(8);
        assert_eq!(user.id(), Some(7));
    }

    #[test]
    fn serializes_absent_id_as_null() {
        let json = serde_json::to_value(User::new("bob", "bob@example.com")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": null, "username": "bob", "email": "bob@example.com" })
        );
    }

    #[test]
    fn new_user_payload_converts_without_identity() {
        let payload: NewUser =
            serde_json::from_str(r#"{"username":"carol","email":"carol@example.com"}"#).unwrap();
        let user = User::from(payload);
        assert!(!user.is_persisted());
        assert_eq!(user.username(), "carol");
    }
}
