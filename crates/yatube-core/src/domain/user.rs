use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest accepted username.
pub const USERNAME_MAX_LEN: usize = 150;

/// User entity - a registered account that can author posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(username: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Usernames are non-empty, at most 150 characters, and made of
    /// letters, digits and `@ . + - _`.
    pub fn is_valid_username(username: &str) -> bool {
        !username.is_empty()
            && username.chars().count() <= USERNAME_MAX_LEN
            && username
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(User::is_valid_username("auth"));
        assert!(User::is_valid_username("Виртуальный_Автор"));
        assert!(User::is_valid_username("john.doe+blog@example"));
        assert!(!User::is_valid_username(""));
        assert!(!User::is_valid_username("has space"));
        assert!(!User::is_valid_username("slash/name"));
        assert!(!User::is_valid_username(&"a".repeat(151)));
    }
}
