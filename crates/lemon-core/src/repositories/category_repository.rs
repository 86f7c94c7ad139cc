//! Category repository trait (port)

use async_trait::async_trait;
use lemon_shared::EntityId;

use crate::domain::{Category, NewCategory};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>, DomainError>;
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Category>, DomainError>;
    /// Fails with `CategorySlugAlreadyExists` on a duplicate slug.
    async fn create(&self, category: &NewCategory) -> Result<Category, DomainError>;
    async fn is_referenced(&self, id: EntityId) -> Result<bool, DomainError>;
    /// Returns whether a row was deleted.
    async fn delete(&self, id: EntityId) -> Result<bool, DomainError>;
}
