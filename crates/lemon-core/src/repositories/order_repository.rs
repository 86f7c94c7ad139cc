//! Order repository trait (port)

use async_trait::async_trait;
use chrono::NaiveDate;
use lemon_shared::{EntityId, Pagination};

use crate::domain::{Order, OrderChanges, OrderScope};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn list(&self, scope: OrderScope, page: Pagination) -> Result<Vec<Order>, DomainError>;

    /// Returns `None` when the order does not exist or lies outside `scope`.
    async fn find_by_id(&self, id: EntityId, scope: OrderScope) -> Result<Option<Order>, DomainError>;

    /// Converts the user's cart into an order in one transaction.
    ///
    /// Implementations read the cart lines, build the order with
    /// [`crate::services::checkout::build_order`], insert the order and its items, and delete
    /// the cart lines. Any failure (including `EmptyCart`) leaves no order behind and the cart
    /// untouched.
    async fn checkout(&self, user_id: EntityId, date: NaiveDate) -> Result<Order, DomainError>;

    async fn update(&self, id: EntityId, changes: &OrderChanges) -> Result<Option<Order>, DomainError>;

    /// Deletes the order and its items.
    async fn delete(&self, id: EntityId) -> Result<bool, DomainError>;
}
