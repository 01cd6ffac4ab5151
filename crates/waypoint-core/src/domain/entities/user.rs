//! User entity.

use super::super::value_objects::{Email, UserRole};
use crate::UserId;
use serde::{Deserialize, Serialize};

/// A registered user. Owns chats and authored messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Database-assigned identifier.
    pub id: UserId,
    /// Display login.
    pub login: String,
    /// Unique, normalised email address.
    pub email: Email,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Account role.
    pub role: UserRole,
}

impl User {
    /// Checks if the user is an admin.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }
}

/// Insert payload for a user; the id is assigned by the database.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub login: String,
    pub email: Email,
    pub password_hash: String,
    pub role: UserRole,
}

impl NewUser {
    /// Creates an insert payload with the default role.
    #[must_use]
    pub fn new(login: impl Into<String>, email: Email, password_hash: impl Into<String>) -> Self {
        Self {
            login: login.into().trim().to_string(),
            email,
            password_hash: password_hash.into(),
            role: UserRole::default(),
        }
    }

    /// Overrides the role.
    #[must_use]
    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    /// Materialises the user once an id has been assigned.
    #[must_use]
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            login: self.login,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user() -> NewUser {
        NewUser::new(" rider ", Email::new("rider@example.com").unwrap(), "$argon2id$hash")
    }

    #[test]
    fn test_new_user_defaults_to_user_role() {
        let user = new_user();
        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.login, "rider");
    }

    #[test]
    fn test_into_user_keeps_fields() {
        let user = new_user().with_role(UserRole::Admin).into_user(UserId::new(5));
        assert_eq!(user.id(), &UserId::new(5));
        assert!(user.is_admin());
        assert_eq!(user.email.as_str(), "rider@example.com");
    }

    #[test]
    fn test_user_json_round_trip_keeps_hash() {
        let user = new_user().into_user(UserId::new(1));
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"role\":\"USER\""));
        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }
}
