use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest accepted group title.
pub const TITLE_MAX_LEN: usize = 200;
/// Longest accepted group slug.
pub const SLUG_MAX_LEN: usize = 50;

/// Group entity - a topic that posts can optionally belong to.
///
/// The `slug` is unique across groups and addresses the group feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl Group {
    pub fn new(title: String, slug: String, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            slug,
            description,
        }
    }

    /// Slugs accepted when creating a group: ASCII letters, digits,
    /// hyphens and underscores, at most 50 characters.
    pub fn is_valid_slug(slug: &str) -> bool {
        !slug.is_empty()
            && slug.len() <= SLUG_MAX_LEN
            && slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}
