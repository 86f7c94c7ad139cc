// ============================================================================
// Lemon Infrastructure - PostgreSQL Category Repository
// File: crates/lemon-infrastructure/src/database/postgres/category_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use lemon_core::domain::{Category, NewCategory};
use lemon_core::error::DomainError;
use lemon_core::repositories::CategoryRepository;
use lemon_shared::EntityId;
use sqlx::{FromRow, PgPool};
use tracing::info;

use super::{db_error, is_foreign_key_violation, is_unique_violation};

pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: i64,
    title: String,
    slug: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category { id: row.id, title: row.title, slug: row.slug }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, DomainError> {
        let rows: Vec<CategoryRow> =
            sqlx::query_as("SELECT id, title, slug FROM categories ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("listing categories", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<Category>, DomainError> {
        let row: Option<CategoryRow> =
            sqlx::query_as("SELECT id, title, slug FROM categories WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("finding category", e))?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, category: &NewCategory) -> Result<Category, DomainError> {
        info!("Creating category: {}", category.slug);

        let row: CategoryRow = sqlx::query_as(
            "INSERT INTO categories (title, slug) VALUES ($1, $2) RETURNING id, title, slug",
        )
        .bind(&category.title)
        .bind(&category.slug)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::CategorySlugAlreadyExists(category.slug.clone())
            } else {
                db_error("creating category", e)
            }
        })?;

        Ok(row.into())
    }

    async fn is_referenced(&self, id: EntityId) -> Result<bool, DomainError> {
        let referenced: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM menu_items WHERE category_id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error("checking category references", e))?;

        Ok(referenced)
    }

    async fn delete(&self, id: EntityId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    DomainError::CategoryInUse(id)
                } else {
                    db_error("deleting category", e)
                }
            })?;

        Ok(result.rows_affected() > 0)
    }
}
