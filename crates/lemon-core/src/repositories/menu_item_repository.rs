//! Menu item repository trait (port)

use async_trait::async_trait;
use lemon_shared::EntityId;

use crate::domain::{MenuItem, MenuItemChanges, MenuItemQuery, NewMenuItem};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuItemRepository: Send + Sync {
    async fn list(&self, query: &MenuItemQuery) -> Result<Vec<MenuItem>, DomainError>;
    async fn find_by_id(&self, id: EntityId) -> Result<Option<MenuItem>, DomainError>;
    /// Fails with `CategoryNotFound` when the category does not exist.
    async fn create(&self, item: &NewMenuItem) -> Result<MenuItem, DomainError>;
    /// Returns `None` when the item does not exist.
    async fn update(
        &self,
        id: EntityId,
        changes: &MenuItemChanges,
    ) -> Result<Option<MenuItem>, DomainError>;
    /// Fails with `MenuItemInUse` when order items reference it. Cart rows are dropped.
    async fn delete(&self, id: EntityId) -> Result<bool, DomainError>;
}
