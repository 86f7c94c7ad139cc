//! Group membership repository trait (port)

use async_trait::async_trait;
use lemon_shared::EntityId;

use crate::domain::{Role, RoleSet, User};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn roles_of(&self, user_id: EntityId) -> Result<RoleSet, DomainError>;
    async fn members(&self, role: Role) -> Result<Vec<User>, DomainError>;
    async fn is_member(&self, user_id: EntityId, role: Role) -> Result<bool, DomainError>;
    /// Returns `false` when the user was already a member.
    async fn add_member(&self, user_id: EntityId, role: Role) -> Result<bool, DomainError>;
    /// Returns `false` when the user was not a member.
    async fn remove_member(&self, user_id: EntityId, role: Role) -> Result<bool, DomainError>;
}
