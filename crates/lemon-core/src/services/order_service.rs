// ============================================================================
// Lemon Core - Order Service
// File: crates/lemon-core/src/services/order_service.rs
// ============================================================================
//! Order placement, role-scoped listing, and the update gate.

use std::sync::Arc;

use chrono::Utc;
use lemon_shared::{EntityId, Pagination};
use tracing::{info, warn};

use crate::domain::{CallerContext, Order, OrderChanges, PlaceOrder, Role};
use crate::error::DomainError;
use crate::repositories::{GroupRepository, OrderRepository};
use crate::services::policy::{authorize, Operation};
use crate::services::visibility::order_scope;

pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    groups: Arc<dyn GroupRepository>,
}

impl OrderService {
    pub fn new(orders: Arc<dyn OrderRepository>, groups: Arc<dyn GroupRepository>) -> Self {
        Self { orders, groups }
    }

    /// Converts the caller's cart into an order. Not idempotent: each call with a non-empty
    /// cart creates a new order.
    pub async fn place_order(
        &self,
        caller: &CallerContext,
        request: PlaceOrder,
    ) -> Result<Order, DomainError> {
        authorize(Some(caller), Operation::PlaceOrder)?;

        let date = request.date.unwrap_or_else(|| Utc::now().date_naive());
        let order = self.orders.checkout(caller.user_id, date).await.map_err(|e| {
            if matches!(e, DomainError::EmptyCart) {
                warn!("User {} tried to order with an empty cart", caller.user_id);
            }
            e
        })?;

        info!(
            "Order {} placed by user {}: {} items, total {}",
            order.id,
            caller.user_id,
            order.items.len(),
            order.total
        );
        Ok(order)
    }

    pub async fn list_orders(
        &self,
        caller: &CallerContext,
        page: Pagination,
    ) -> Result<Vec<Order>, DomainError> {
        authorize(Some(caller), Operation::ViewOrders)?;
        self.orders.list(order_scope(caller), page).await
    }

    pub async fn get_order(&self, caller: &CallerContext, id: EntityId) -> Result<Order, DomainError> {
        authorize(Some(caller), Operation::ViewOrders)?;
        self.orders
            .find_by_id(id, order_scope(caller))
            .await?
            .ok_or(DomainError::OrderNotFound(id))
    }

    /// Customers may not alter an order once placed. Other roles may change status,
    /// delivery crew and date on orders they can see.
    pub async fn update_order(
        &self,
        caller: &CallerContext,
        id: EntityId,
        changes: OrderChanges,
    ) -> Result<Order, DomainError> {
        authorize(Some(caller), Operation::UpdateOrder)?;

        let current = self.get_order(caller, id).await?;
        if changes.is_empty() {
            return Ok(current);
        }

        if let Some(Some(crew_id)) = changes.delivery_crew_id {
            if !self.groups.is_member(crew_id, Role::DeliveryCrew).await? {
                return Err(DomainError::ValidationError(format!(
                    "User {} is not in the {} group",
                    crew_id,
                    Role::DeliveryCrew.display_name()
                )));
            }
        }

        let updated = self
            .orders
            .update(id, &changes)
            .await?
            .ok_or(DomainError::OrderNotFound(id))?;
        info!("Order {} updated by user {}", id, caller.user_id);
        Ok(updated)
    }

    /// Only orders the caller can see may be deleted; anything else reads as not found.
    pub async fn delete_order(&self, caller: &CallerContext, id: EntityId) -> Result<(), DomainError> {
        authorize(Some(caller), Operation::DeleteOrder)?;
        self.get_order(caller, id).await?;
        if !self.orders.delete(id).await? {
            return Err(DomainError::OrderNotFound(id));
        }
        info!("Order {} deleted by user {}", id, caller.user_id);
        Ok(())
    }
}
