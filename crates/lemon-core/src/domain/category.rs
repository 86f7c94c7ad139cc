// ============================================================================
// Lemon Core - Category Entity
// File: crates/lemon-core/src/domain/category.rs
// ============================================================================

use lemon_shared::utils::{is_valid_slug, slugify};
use lemon_shared::EntityId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: EntityId,
    pub title: String,
    pub slug: String,
}

/// Validated input for a new category.
#[derive(Debug, Clone, Validate)]
pub struct NewCategory {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 255, message = "Slug must be between 1 and 255 characters"))]
    pub slug: String,
}

impl NewCategory {
    /// Derives the slug from the title when none is given.
    pub fn new(title: String, slug: Option<String>) -> Result<Self, DomainError> {
        let title = title.trim().to_string();
        let slug = match slug.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
            Some(s) => s,
            None => slugify(&title),
        };

        let category = Self { title, slug };
        category.validate()?;

        if !is_valid_slug(&category.slug) {
            return Err(DomainError::ValidationError(format!(
                "Slug may only contain letters, numbers, underscores or hyphens: {}",
                category.slug
            )));
        }
        Ok(category)
    }
}
