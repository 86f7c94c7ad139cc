//! Repository traits (ports)

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DomainError;

pub mod category_repository;
pub mod menu_item_repository;
pub mod cart_repository;
pub mod order_repository;
pub mod user_repository;
pub mod group_repository;

pub use category_repository::CategoryRepository;
pub use menu_item_repository::MenuItemRepository;
pub use cart_repository::CartRepository;
pub use order_repository::OrderRepository;
pub use user_repository::UserRepository;
pub use group_repository::GroupRepository;

/// The full set of adapters a store provides.
#[derive(Clone)]
pub struct Repositories {
    pub categories: Arc<dyn CategoryRepository>,
    pub menu_items: Arc<dyn MenuItemRepository>,
    pub cart: Arc<dyn CartRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub health: Arc<dyn StoreHealth>,
}

/// Liveness of the backing store, used by the readiness probe.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn health_check(&self) -> Result<(), DomainError>;
    fn backend_name(&self) -> &'static str;
}
