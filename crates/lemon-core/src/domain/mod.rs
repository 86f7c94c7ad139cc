//! # Lemon Core - Domain Module
//!
//! Domain entities for the ordering API.

pub mod category;
pub mod menu_item;
pub mod cart;
pub mod order;
pub mod user;
pub mod role;
pub mod caller;

// Re-export all entities and enums
pub use category::{Category, NewCategory};
pub use menu_item::{
    MenuItem, MenuItemChanges, MenuItemOrdering, MenuItemQuery, MenuItemSortField, NewMenuItem,
};
pub use cart::{CartLine, NewCartLine};
pub use order::{
    Order, OrderChanges, OrderDraft, OrderItem, OrderItemDraft, OrderScope, OrderStatus,
    PlaceOrder,
};
pub use user::{NewUser, User};
pub use role::{AccessLevel, Role, RoleSet};
pub use caller::CallerContext;
