// ============================================================================
// Lemon Infrastructure - PostgreSQL Group Repository
// File: crates/lemon-infrastructure/src/database/postgres/group_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use lemon_core::domain::{Role, RoleSet, User};
use lemon_core::error::DomainError;
use lemon_core::repositories::GroupRepository;
use lemon_shared::EntityId;
use sqlx::PgPool;
use tracing::warn;

use super::db_error;
use super::user_repo_impl::UserRow;

pub struct PgGroupRepository {
    pool: PgPool,
}

impl PgGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupRepository for PgGroupRepository {
    async fn roles_of(&self, user_id: EntityId) -> Result<RoleSet, DomainError> {
        let names: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT g.name
            FROM groups g
            JOIN user_groups ug ON ug.group_id = g.id
            WHERE ug.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("loading user groups", e))?;

        Ok(names
            .iter()
            .filter_map(|name| {
                let role = Role::from_display_name(name);
                if role.is_none() {
                    warn!("Ignoring unknown group '{}' for user {}", name, user_id);
                }
                role
            })
            .collect())
    }

    async fn members(&self, role: Role) -> Result<Vec<User>, DomainError> {
        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
            SELECT u.id, u.username, u.email, u.first_name, u.last_name,
                   u.password_hash, u.is_superuser, u.date_joined
            FROM users u
            JOIN user_groups ug ON ug.user_id = u.id
            JOIN groups g ON g.id = ug.group_id
            WHERE g.name = $1
            ORDER BY u.id
            "#,
        )
        .bind(role.display_name())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing group members", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn is_member(&self, user_id: EntityId, role: Role) -> Result<bool, DomainError> {
        let member: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM user_groups ug
                JOIN groups g ON g.id = ug.group_id
                WHERE ug.user_id = $1 AND g.name = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(role.display_name())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("checking group membership", e))?;

        Ok(member)
    }

    async fn add_member(&self, user_id: EntityId, role: Role) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_groups (user_id, group_id)
            SELECT $1, g.id FROM groups g WHERE g.name = $2
            ON CONFLICT (user_id, group_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(role.display_name())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("adding group member", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_member(&self, user_id: EntityId, role: Role) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_groups ug
            USING groups g
            WHERE ug.group_id = g.id AND ug.user_id = $1 AND g.name = $2
            "#,
        )
        .bind(user_id)
        .bind(role.display_name())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("removing group member", e))?;

        Ok(result.rows_affected() > 0)
    }
}
