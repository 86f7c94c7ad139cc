//! Cart repository trait (port)

use async_trait::async_trait;
use lemon_shared::EntityId;

use crate::domain::{CartLine, NewCartLine};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn list_for_user(&self, user_id: EntityId) -> Result<Vec<CartLine>, DomainError>;
    /// Fails with `DuplicateCartItem` when the user already has a row for the item.
    async fn add(&self, line: &NewCartLine) -> Result<CartLine, DomainError>;
    /// Returns the number of rows removed.
    async fn clear_for_user(&self, user_id: EntityId) -> Result<u64, DomainError>;
}
