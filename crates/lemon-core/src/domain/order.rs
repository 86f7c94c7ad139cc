// ============================================================================
// Lemon Core - Order Entity
// File: crates/lemon-core/src/domain/order.rs
// Description: Placed orders, their immutable line items, and visibility scopes
// ============================================================================

use chrono::NaiveDate;
use lemon_shared::EntityId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    NotDelivered,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::NotDelivered => "not_delivered",
            OrderStatus::Delivered => "delivered",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "not_delivered" => Some(OrderStatus::NotDelivered),
            "delivered" => Some(OrderStatus::Delivered),
            _ => None,
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::NotDelivered
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: EntityId,
    pub user_id: EntityId,
    pub delivery_crew_id: Option<EntityId>,
    pub status: OrderStatus,
    pub date: NaiveDate,
    pub total: Decimal,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Sum of line prices; equals `total` for every order built from a cart.
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(|i| i.price).sum()
    }
}

/// Historical line of an order. Never edited after placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: EntityId,
    pub order_id: EntityId,
    pub menu_item_id: EntityId,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub price: Decimal,
}

/// Caller-supplied fields merged into a new order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlaceOrder {
    pub date: Option<NaiveDate>,
}

/// Order computed from cart lines, ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub user_id: EntityId,
    pub date: NaiveDate,
    pub total: Decimal,
    pub items: Vec<OrderItemDraft>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemDraft {
    pub menu_item_id: EntityId,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub price: Decimal,
}

impl OrderItemDraft {
    pub fn into_item(self, id: EntityId, order_id: EntityId) -> OrderItem {
        OrderItem {
            id,
            order_id,
            menu_item_id: self.menu_item_id,
            quantity: self.quantity,
            unit_price: self.unit_price,
            price: self.price,
        }
    }
}

/// Field-level update of an existing order. Total and items are not editable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderChanges {
    pub status: Option<OrderStatus>,
    /// `Some(None)` unassigns the delivery crew.
    pub delivery_crew_id: Option<Option<EntityId>>,
    pub date: Option<NaiveDate>,
}

impl OrderChanges {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.delivery_crew_id.is_none() && self.date.is_none()
    }

    pub fn apply(&self, order: &mut Order) {
        if let Some(status) = self.status {
            order.status = status;
        }
        if let Some(crew) = self.delivery_crew_id {
            order.delivery_crew_id = crew;
        }
        if let Some(date) = self.date {
            order.date = date;
        }
    }
}

/// Which orders a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    All,
    OwnedBy(EntityId),
    AssignedTo(EntityId),
}

impl OrderScope {
    pub fn includes(&self, order: &Order) -> bool {
        match self {
            OrderScope::All => true,
            OrderScope::OwnedBy(user_id) => order.user_id == *user_id,
            OrderScope::AssignedTo(user_id) => order.delivery_crew_id == Some(*user_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(user_id: EntityId, crew: Option<EntityId>) -> Order {
        Order {
            id: 1,
            user_id,
            delivery_crew_id: crew,
            status: OrderStatus::default(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            total: Decimal::ZERO,
            items: Vec::new(),
        }
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(OrderStatus::from_str("delivered"), Some(OrderStatus::Delivered));
        assert_eq!(OrderStatus::NotDelivered.as_str(), "not_delivered");
        assert_eq!(OrderStatus::from_str("lost"), None);
    }

    #[test]
    fn test_scope_includes() {
        let o = order(1, Some(2));
        assert!(OrderScope::All.includes(&o));
        assert!(OrderScope::OwnedBy(1).includes(&o));
        assert!(!OrderScope::OwnedBy(2).includes(&o));
        assert!(OrderScope::AssignedTo(2).includes(&o));
        assert!(!OrderScope::AssignedTo(1).includes(&o));
        assert!(!OrderScope::AssignedTo(2).includes(&order(1, None)));
    }

    #[test]
    fn test_changes_unassign_crew() {
        let mut o = order(1, Some(2));
        let changes = OrderChanges {
            status: Some(OrderStatus::Delivered),
            delivery_crew_id: Some(None),
            date: None,
        };
        changes.apply(&mut o);
        assert_eq!(o.status, OrderStatus::Delivered);
        assert_eq!(o.delivery_crew_id, None);
    }
}
