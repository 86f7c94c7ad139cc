// ============================================================================
// Lemon Infrastructure - PostgreSQL Order Repository
// File: crates/lemon-infrastructure/src/database/postgres/order_repo_impl.rs
// ============================================================================

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use lemon_core::domain::{CartLine, Order, OrderChanges, OrderItem, OrderScope, OrderStatus};
use lemon_core::error::DomainError;
use lemon_core::repositories::OrderRepository;
use lemon_core::services::checkout::build_order;
use lemon_shared::{EntityId, Pagination};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{debug, info, warn};

use super::cart_repo_impl::CartLineRow;
use super::{db_error, is_foreign_key_violation};

pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads the items of the given orders, grouped by order id.
    async fn items_for(
        &self,
        order_ids: &[EntityId],
    ) -> Result<HashMap<EntityId, Vec<OrderItem>>, DomainError> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<OrderItemRow> = sqlx::query_as(
            r#"
            SELECT id, order_id, menu_item_id, quantity, unit_price, price
            FROM order_items
            WHERE order_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("loading order items", e))?;

        let mut grouped: HashMap<EntityId, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            grouped.entry(row.order_id).or_default().push(row.into());
        }
        Ok(grouped)
    }

    async fn with_items(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, DomainError> {
        let ids: Vec<EntityId> = rows.iter().map(|r| r.id).collect();
        let mut items = self.items_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let order_items = items.remove(&row.id).unwrap_or_default();
                row.into_order(order_items)
            })
            .collect())
    }
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    delivery_crew_id: Option<i64>,
    status: String,
    date: NaiveDate,
    total: Decimal,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            user_id: self.user_id,
            delivery_crew_id: self.delivery_crew_id,
            status: OrderStatus::from_str(&self.status).unwrap_or_default(),
            date: self.date,
            total: self.total,
            items,
        }
    }
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: i64,
    menu_item_id: i64,
    quantity: i32,
    unit_price: Decimal,
    price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            id: row.id,
            order_id: row.order_id,
            menu_item_id: row.menu_item_id,
            quantity: row.quantity,
            unit_price: row.unit_price,
            price: row.price,
        }
    }
}

fn push_scope(qb: &mut QueryBuilder<'_, Postgres>, scope: OrderScope) {
    match scope {
        OrderScope::All => {
            qb.push(" WHERE TRUE");
        }
        OrderScope::OwnedBy(user_id) => {
            qb.push(" WHERE user_id = ").push_bind(user_id);
        }
        OrderScope::AssignedTo(user_id) => {
            qb.push(" WHERE delivery_crew_id = ").push_bind(user_id);
        }
    }
}

const SELECT_ORDER: &str = "SELECT id, user_id, delivery_crew_id, status, date, total FROM orders";

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn list(&self, scope: OrderScope, page: Pagination) -> Result<Vec<Order>, DomainError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_ORDER);
        push_scope(&mut qb, scope);
        qb.push(" ORDER BY id LIMIT ")
            .push_bind(page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);

        let rows: Vec<OrderRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("listing orders", e))?;

        self.with_items(rows).await
    }

    async fn find_by_id(&self, id: EntityId, scope: OrderScope) -> Result<Option<Order>, DomainError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_ORDER);
        push_scope(&mut qb, scope);
        qb.push(" AND id = ").push_bind(id);

        let row: Option<OrderRow> = qb
            .build_query_as()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding order", e))?;

        match row {
            Some(row) => Ok(self.with_items(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn checkout(&self, user_id: EntityId, date: NaiveDate) -> Result<Order, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("starting checkout", e))?;

        // Row locks keep a concurrent add/clear from slipping between read and delete.
        let lines: Vec<CartLineRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, menu_item_id, quantity, unit_price, price
            FROM cart_lines
            WHERE user_id = $1
            ORDER BY id
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| db_error("reading cart for checkout", e))?;
        let lines: Vec<CartLine> = lines.into_iter().map(Into::into).collect();

        let draft = build_order(user_id, &lines, date)?;

        let order_row: OrderRow = sqlx::query_as(
            r#"
            INSERT INTO orders (user_id, status, date, total)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, delivery_crew_id, status, date, total
            "#,
        )
        .bind(draft.user_id)
        .bind(OrderStatus::NotDelivered.as_str())
        .bind(draft.date)
        .bind(draft.total)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("inserting order", e))?;

        let mut items = Vec::with_capacity(draft.items.len());
        for item in draft.items {
            let item_id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO order_items (order_id, menu_item_id, quantity, unit_price, price)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                "#,
            )
            .bind(order_row.id)
            .bind(item.menu_item_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.price)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| db_error("inserting order item", e))?;
            items.push(item.into_item(item_id, order_row.id));
        }

        let cleared = sqlx::query("DELETE FROM cart_lines WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("clearing cart after checkout", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("committing checkout", e))?;

        debug!("Checkout for user {} removed {} cart rows", user_id, cleared.rows_affected());
        Ok(order_row.into_order(items))
    }

    async fn update(&self, id: EntityId, changes: &OrderChanges) -> Result<Option<Order>, DomainError> {
        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE orders SET
                status = COALESCE($2::VARCHAR, status),
                delivery_crew_id = CASE WHEN $3::BOOLEAN THEN $4::BIGINT ELSE delivery_crew_id END,
                date = COALESCE($5::DATE, date)
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(changes.status.map(|s| s.as_str()))
        .bind(changes.delivery_crew_id.is_some())
        .bind(changes.delivery_crew_id.flatten())
        .bind(changes.date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                warn!("Order {} assigned to a missing user", id);
                DomainError::ValidationError("Delivery crew user does not exist".to_string())
            } else {
                db_error("updating order", e)
            }
        })?;

        match updated {
            Some(id) => self.find_by_id(id, OrderScope::All).await,
            None => Ok(None),
        }
    }

    async fn delete(&self, id: EntityId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting order", e))?;

        if result.rows_affected() > 0 {
            info!("Order {} and its items deleted", id);
        }
        Ok(result.rows_affected() > 0)
    }
}
