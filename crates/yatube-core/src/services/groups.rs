//! Group administration.

use std::sync::Arc;

use crate::domain::{Group, TITLE_MAX_LEN};
use crate::error::DomainError;
use crate::ports::GroupRepository;

/// Fields of a group to be created.
#[derive(Debug, Clone)]
pub struct NewGroup {
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Clone)]
pub struct GroupService {
    groups: Arc<dyn GroupRepository>,
}

impl GroupService {
    pub fn new(groups: Arc<dyn GroupRepository>) -> Self {
        Self { groups }
    }

    pub async fn list(&self) -> Result<Vec<Group>, DomainError> {
        Ok(self.groups.list().await?)
    }

    pub async fn create(&self, new: NewGroup) -> Result<Group, DomainError> {
        let title = new.title.trim();
        if title.is_empty() || title.chars().count() > TITLE_MAX_LEN {
            return Err(DomainError::Validation(format!(
                "title must be 1 to {TITLE_MAX_LEN} characters"
            )));
        }
        if !Group::is_valid_slug(&new.slug) {
            return Err(DomainError::Validation(
                "slug may contain only latin letters, digits, hyphens and underscores".to_string(),
            ));
        }
        if new.description.trim().is_empty() {
            return Err(DomainError::Validation("description is required".to_string()));
        }

        if self.groups.find_by_slug(&new.slug).await?.is_some() {
            return Err(DomainError::Duplicate(format!(
                "group with slug '{}' already exists",
                new.slug
            )));
        }

        let group = Group::new(title.to_string(), new.slug, new.description);
        Ok(self.groups.save(group).await?)
    }

    /// Delete the group; its posts stay and lose their group.
    pub async fn delete(&self, slug: &str) -> Result<(), DomainError> {
        let group = self
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("group", slug))?;
        self.groups.delete(group.id).await?;
        Ok(())
    }
}
