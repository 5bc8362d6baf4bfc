use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Group, User};

/// Number of characters kept by [`Post::short_label`].
pub const COUNT_OF_CUT: usize = 15;

/// Post entity - a blog entry written by a user.
///
/// `pub_date` is assigned once in [`Post::new`] and is the feed sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
}

impl Post {
    /// Create a new post published now.
    pub fn new(author_id: Uuid, text: String, group_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            pub_date: Utc::now(),
            author_id,
            group_id,
        }
    }

    /// First [`COUNT_OF_CUT`] characters of the text, cut without an ellipsis.
    pub fn short_label(&self) -> String {
        self.text.chars().take(COUNT_OF_CUT).collect()
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}

impl std::fmt::Display for Post {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.short_label())
    }
}

/// Public part of a user shown next to their posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub username: String,
}

impl From<&User> for Author {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// A post together with its resolved author and group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub post: Post,
    pub author: Author,
    pub group: Option<Group>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_with_text(text: &str) -> Post {
        Post::new(Uuid::new_v4(), text.to_string(), None)
    }

    #[test]
    fn test_short_label_cuts_long_text() {
        let post = post_with_text("Тестовый пост, который длиннее пятнадцати символов");
        assert_eq!(post.short_label(), "Тестовый пост, ");
        assert_eq!(post.short_label().chars().count(), COUNT_OF_CUT);
    }

    #[test]
    fn test_short_label_keeps_short_text() {
        assert_eq!(post_with_text("Тестовый пост").short_label(), "Тестовый пост");
        assert_eq!(post_with_text("").short_label(), "");
        assert_eq!(post_with_text("exactly15chars!").short_label(), "exactly15chars!");
    }

    #[test]
    fn test_display_matches_short_label() {
        let post = post_with_text("tests0 with a longer body");
        assert_eq!(post.to_string(), post.short_label());
        assert_eq!(post.to_string(), "tests0 with a l");
    }

    #[test]
    fn test_authorship() {
        let author = Uuid::new_v4();
        let post = Post::new(author, "text".to_string(), None);
        assert!(post.is_authored_by(author));
        assert!(!post.is_authored_by(Uuid::new_v4()));
    }
}
