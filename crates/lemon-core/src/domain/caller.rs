//! Explicit per-request caller context

use lemon_shared::EntityId;
use serde::Serialize;

use super::role::{AccessLevel, Role, RoleSet};
use super::user::User;

/// Who is calling, with roles resolved once when the request is authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallerContext {
    pub user_id: EntityId,
    pub username: String,
    pub is_superuser: bool,
    pub roles: RoleSet,
    pub access: AccessLevel,
}

impl CallerContext {
    pub fn new(user: &User, roles: RoleSet) -> Self {
        let access = AccessLevel::resolve(user.is_superuser, &roles);
        Self {
            user_id: user.id,
            username: user.username.clone(),
            is_superuser: user.is_superuser,
            roles,
            access,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Member of no group at all.
    pub fn is_customer(&self) -> bool {
        self.roles.is_empty()
    }

    /// Manager group members and superusers.
    pub fn is_manager(&self) -> bool {
        self.is_superuser || self.has_role(Role::Manager)
    }
}
