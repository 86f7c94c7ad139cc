// ============================================================================
// Lemon Infrastructure - PostgreSQL Cart Repository
// File: crates/lemon-infrastructure/src/database/postgres/cart_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use lemon_core::domain::{CartLine, NewCartLine};
use lemon_core::error::DomainError;
use lemon_core::repositories::CartRepository;
use lemon_shared::EntityId;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use super::{db_error, is_unique_violation, violated_constraint};

const CART_UNIQUE_CONSTRAINT: &str = "cart_lines_user_item_key";

pub struct PgCartRepository {
    pool: PgPool,
}

impl PgCartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct CartLineRow {
    pub id: i64,
    pub user_id: i64,
    pub menu_item_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub price: Decimal,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        CartLine {
            id: row.id,
            user_id: row.user_id,
            menu_item_id: row.menu_item_id,
            quantity: row.quantity,
            unit_price: row.unit_price,
            price: row.price,
        }
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn list_for_user(&self, user_id: EntityId) -> Result<Vec<CartLine>, DomainError> {
        let rows: Vec<CartLineRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, menu_item_id, quantity, unit_price, price
            FROM cart_lines
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing cart", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn add(&self, line: &NewCartLine) -> Result<CartLine, DomainError> {
        let row: CartLineRow = sqlx::query_as(
            r#"
            INSERT INTO cart_lines (user_id, menu_item_id, quantity, unit_price, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, menu_item_id, quantity, unit_price, price
            "#,
        )
        .bind(line.user_id)
        .bind(line.menu_item_id)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(line.price)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e)
                && violated_constraint(&e).as_deref() == Some(CART_UNIQUE_CONSTRAINT)
            {
                DomainError::DuplicateCartItem(line.menu_item_id)
            } else {
                db_error("adding cart line", e)
            }
        })?;

        Ok(row.into())
    }

    async fn clear_for_user(&self, user_id: EntityId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM cart_lines WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("clearing cart", e))?;

        Ok(result.rows_affected())
    }
}
