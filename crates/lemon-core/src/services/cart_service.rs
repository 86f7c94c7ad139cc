//! Cart service: a user's pending selections.

use std::sync::Arc;

use lemon_shared::EntityId;
use tracing::info;

use crate::domain::{CallerContext, CartLine, NewCartLine};
use crate::error::DomainError;
use crate::repositories::{CartRepository, MenuItemRepository};
use crate::services::policy::{authorize, Operation};

pub struct CartService {
    cart: Arc<dyn CartRepository>,
    menu_items: Arc<dyn MenuItemRepository>,
}

impl CartService {
    pub fn new(cart: Arc<dyn CartRepository>, menu_items: Arc<dyn MenuItemRepository>) -> Self {
        Self { cart, menu_items }
    }

    pub async fn list(&self, caller: &CallerContext) -> Result<Vec<CartLine>, DomainError> {
        authorize(Some(caller), Operation::UseCart)?;
        self.cart.list_for_user(caller.user_id).await
    }

    /// Adds a row for the menu item, pricing it from the item's current price.
    pub async fn add(
        &self,
        caller: &CallerContext,
        menu_item_id: EntityId,
        quantity: i32,
    ) -> Result<CartLine, DomainError> {
        authorize(Some(caller), Operation::UseCart)?;

        let item = self.menu_items.find_by_id(menu_item_id).await?.ok_or_else(|| {
            DomainError::ValidationError(format!("Menu item {} does not exist", menu_item_id))
        })?;
        let line = NewCartLine::for_item(caller.user_id, &item, quantity)?;

        let created = self.cart.add(&line).await?;
        info!(
            "User {} added menu item {} x{} to cart",
            caller.user_id, menu_item_id, quantity
        );
        Ok(created)
    }

    pub async fn clear(&self, caller: &CallerContext) -> Result<u64, DomainError> {
        authorize(Some(caller), Operation::UseCart)?;
        let removed = self.cart.clear_for_user(caller.user_id).await?;
        info!("User {} cleared {} cart rows", caller.user_id, removed);
        Ok(removed)
    }
}
