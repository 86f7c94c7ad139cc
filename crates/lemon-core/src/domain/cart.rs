// ============================================================================
// Lemon Core - Cart Entity
// File: crates/lemon-core/src/domain/cart.rs
// Description: Pending (user, menu item) selections before an order is placed
// ============================================================================

use lemon_shared::constants::MAX_CART_QUANTITY;
use lemon_shared::EntityId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::menu_item::{ensure_storable, MenuItem};
use crate::error::DomainError;

/// One cart row. `price` is the line total (`unit_price * quantity`) fixed when the row is added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: EntityId,
    pub user_id: EntityId,
    pub menu_item_id: EntityId,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCartLine {
    pub user_id: EntityId,
    pub menu_item_id: EntityId,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub price: Decimal,
}

impl NewCartLine {
    /// Snapshots the item's current price.
    pub fn for_item(user_id: EntityId, item: &MenuItem, quantity: i32) -> Result<Self, DomainError> {
        if quantity < 1 {
            return Err(DomainError::ValidationError(
                "Quantity must be at least 1".to_string(),
            ));
        }
        if quantity > MAX_CART_QUANTITY {
            return Err(DomainError::ValidationError(format!(
                "Quantity may not exceed {}",
                MAX_CART_QUANTITY
            )));
        }
        let price = item.price * Decimal::from(quantity);
        ensure_storable(price, "Line total")?;
        Ok(Self {
            user_id,
            menu_item_id: item.id,
            quantity,
            unit_price: item.price,
            price,
        })
    }

    pub fn into_line(self, id: EntityId) -> CartLine {
        CartLine {
            id,
            user_id: self.user_id,
            menu_item_id: self.menu_item_id,
            quantity: self.quantity,
            unit_price: self.unit_price,
            price: self.price,
        }
    }
}
