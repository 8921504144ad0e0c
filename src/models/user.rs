use serde::{Deserialize, Serialize};

/// A registered account. Immutable once created; credentials live elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    /// Display name.
    pub name: String,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            email: email.into(),
            name: name.into(),
        }
    }
}

/// Password shared by the demo accounts.
pub const DEMO_PASSWORD: &str = "password";

/// Accounts available before anyone has registered.
pub fn demo_users() -> Vec<User> {
    vec![
        User::new("1", "admin", "admin@example.com", "Administrator"),
        User::new("2", "john", "john@example.com", "John Doe"),
        User::new("3", "jane", "jane@example.com", "Jane Smith"),
        User::new("4", "mike", "mike@example.com", "Mike Johnson"),
    ]
}
