//! Cart-to-order conversion

use chrono::NaiveDate;
use lemon_shared::EntityId;
use rust_decimal::Decimal;

use crate::domain::menu_item::ensure_storable;
use crate::domain::{CartLine, OrderDraft, OrderItemDraft};
use crate::error::DomainError;

/// Builds the order for `user_id` from their cart lines.
///
/// The total is the sum of the lines' `price`, which already carries the quantity, and must fit
/// a money column. Store adapters call this inside the transaction that inserts the order and
/// deletes the cart.
pub fn build_order(
    user_id: EntityId,
    lines: &[CartLine],
    date: NaiveDate,
) -> Result<OrderDraft, DomainError> {
    if lines.is_empty() {
        return Err(DomainError::EmptyCart);
    }
    debug_assert!(lines.iter().all(|l| l.user_id == user_id));

    let items: Vec<OrderItemDraft> = lines
        .iter()
        .map(|line| OrderItemDraft {
            menu_item_id: line.menu_item_id,
            quantity: line.quantity,
            unit_price: line.unit_price,
            price: line.price,
        })
        .collect();
    let total: Decimal = items.iter().map(|i| i.price).sum();
    ensure_storable(total, "Order total")?;

    Ok(OrderDraft { user_id, date, total, items })
}
