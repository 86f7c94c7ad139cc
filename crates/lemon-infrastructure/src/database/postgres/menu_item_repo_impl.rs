// ============================================================================
// Lemon Infrastructure - PostgreSQL Menu Item Repository
// File: crates/lemon-infrastructure/src/database/postgres/menu_item_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use lemon_core::domain::{
    Category, MenuItem, MenuItemChanges, MenuItemQuery, MenuItemSortField, NewMenuItem,
};
use lemon_core::error::DomainError;
use lemon_core::repositories::MenuItemRepository;
use lemon_shared::EntityId;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{info, warn};

use super::{db_error, is_foreign_key_violation};

pub struct PgMenuItemRepository {
    pool: PgPool,
}

impl PgMenuItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct MenuItemRow {
    id: i64,
    title: String,
    price: Decimal,
    featured: bool,
    inventory: i32,
    category_id: i64,
    category_title: String,
    category_slug: String,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        MenuItem {
            id: row.id,
            title: row.title,
            price: row.price,
            featured: row.featured,
            inventory: row.inventory,
            category: Category {
                id: row.category_id,
                title: row.category_title,
                slug: row.category_slug,
            },
        }
    }
}

const SELECT_MENU_ITEM: &str = r#"
    SELECT m.id, m.title, m.price, m.featured, m.inventory,
           c.id AS category_id, c.title AS category_title, c.slug AS category_slug
    FROM menu_items m
    JOIN categories c ON c.id = m.category_id
"#;

fn sort_column(field: MenuItemSortField) -> &'static str {
    match field {
        MenuItemSortField::Id => "m.id",
        MenuItemSortField::Title => "m.title",
        MenuItemSortField::Price => "m.price",
        MenuItemSortField::Inventory => "m.inventory",
    }
}

#[async_trait]
impl MenuItemRepository for PgMenuItemRepository {
    async fn list(&self, query: &MenuItemQuery) -> Result<Vec<MenuItem>, DomainError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_MENU_ITEM);
        qb.push(" WHERE TRUE");

        if let Some(title) = &query.title {
            qb.push(" AND m.title = ").push_bind(title.clone());
        }
        if let Some(price) = query.price {
            qb.push(" AND m.price = ").push_bind(price);
        }
        if let Some(slug) = &query.category {
            qb.push(" AND c.slug = ").push_bind(slug.clone());
        }
        if let Some(featured) = query.featured {
            qb.push(" AND m.featured = ").push_bind(featured);
        }
        if let Some(term) = &query.search {
            qb.push(" AND m.title ILIKE ").push_bind(format!("%{}%", term));
        }

        qb.push(" ORDER BY ");
        for ordering in &query.ordering {
            qb.push(sort_column(ordering.field))
                .push(if ordering.descending { " DESC, " } else { " ASC, " });
        }
        qb.push("m.id ASC");

        qb.push(" LIMIT ")
            .push_bind(query.pagination.limit() as i64)
            .push(" OFFSET ")
            .push_bind(query.pagination.offset() as i64);

        let rows: Vec<MenuItemRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("listing menu items", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<MenuItem>, DomainError> {
        let row: Option<MenuItemRow> =
            sqlx::query_as(&format!("{} WHERE m.id = $1", SELECT_MENU_ITEM))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("finding menu item", e))?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, item: &NewMenuItem) -> Result<MenuItem, DomainError> {
        info!("Creating menu item: {}", item.title);

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO menu_items (title, price, featured, inventory, category_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&item.title)
        .bind(item.price)
        .bind(item.featured)
        .bind(item.inventory)
        .bind(item.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DomainError::CategoryNotFound(item.category_id)
            } else {
                db_error("creating menu item", e)
            }
        })?;

        self.find_by_id(id)
            .await?
            .ok_or(DomainError::MenuItemNotFound(id))
    }

    async fn update(
        &self,
        id: EntityId,
        changes: &MenuItemChanges,
    ) -> Result<Option<MenuItem>, DomainError> {
        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE menu_items SET
                title = COALESCE($2, title),
                price = COALESCE($3, price),
                featured = COALESCE($4, featured),
                inventory = COALESCE($5, inventory),
                category_id = COALESCE($6, category_id)
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(changes.price)
        .bind(changes.featured)
        .bind(changes.inventory)
        .bind(changes.category_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DomainError::CategoryNotFound(changes.category_id.unwrap_or_default())
            } else {
                db_error("updating menu item", e)
            }
        })?;

        match updated {
            Some(id) => self.find_by_id(id).await,
            None => Ok(None),
        }
    }

    async fn delete(&self, id: EntityId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    warn!("Menu item {} is referenced by orders", id);
                    DomainError::MenuItemInUse(id)
                } else {
                    db_error("deleting menu item", e)
                }
            })?;

        Ok(result.rows_affected() > 0)
    }
}
