//! PostgreSQL repository implementations

use std::sync::Arc;

use async_trait::async_trait;
use lemon_core::error::DomainError;
use lemon_core::repositories::{Repositories, StoreHealth};
use sqlx::PgPool;
use tracing::error;

pub mod cart_repo_impl;
pub mod category_repo_impl;
pub mod group_repo_impl;
pub mod menu_item_repo_impl;
pub mod order_repo_impl;
pub mod user_repo_impl;

pub use cart_repo_impl::PgCartRepository;
pub use category_repo_impl::PgCategoryRepository;
pub use group_repo_impl::PgGroupRepository;
pub use menu_item_repo_impl::PgMenuItemRepository;
pub use order_repo_impl::PgOrderRepository;
pub use user_repo_impl::PgUserRepository;

/// Wires every Postgres adapter against one pool.
pub fn postgres_repositories(pool: PgPool) -> Repositories {
    Repositories {
        categories: Arc::new(PgCategoryRepository::new(pool.clone())),
        menu_items: Arc::new(PgMenuItemRepository::new(pool.clone())),
        cart: Arc::new(PgCartRepository::new(pool.clone())),
        orders: Arc::new(PgOrderRepository::new(pool.clone())),
        users: Arc::new(PgUserRepository::new(pool.clone())),
        groups: Arc::new(PgGroupRepository::new(pool.clone())),
        health: Arc::new(PgStoreHealth::new(pool)),
    }
}

pub struct PgStoreHealth {
    pool: PgPool,
}

impl PgStoreHealth {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreHealth for PgStoreHealth {
    async fn health_check(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("health check", e))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

/// Logs and wraps a driver error.
pub(crate) fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}

/// Name of the violated unique/foreign-key constraint, if any.
pub(crate) fn violated_constraint(e: &sqlx::Error) -> Option<String> {
    match e {
        sqlx::Error::Database(db) => db.constraint().map(str::to_string),
        _ => None,
    }
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub(crate) fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}
