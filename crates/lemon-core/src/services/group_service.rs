// ============================================================================
// Lemon Core - Group Membership Service
// File: crates/lemon-core/src/services/group_service.rs
// ============================================================================
//! Manager-only administration of the role groups.

use std::sync::Arc;

use lemon_shared::EntityId;
use tracing::{info, warn};

use crate::domain::{CallerContext, Role, User};
use crate::error::DomainError;
use crate::repositories::{GroupRepository, UserRepository};
use crate::services::policy::{authorize, Operation};

/// How a request names the user to add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberRef {
    Id(EntityId),
    Username(String),
}

pub struct GroupService {
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
}

impl GroupService {
    pub fn new(groups: Arc<dyn GroupRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { groups, users }
    }

    /// Resolves a URL group name (`delivery-crew`, `Manager`, ...) to a role.
    pub fn resolve_group(group_name: &str) -> Result<Role, DomainError> {
        Role::from_group_name(group_name)
            .ok_or_else(|| DomainError::GroupNotFound(group_name.to_string()))
    }

    pub async fn list_members(
        &self,
        caller: &CallerContext,
        group_name: &str,
    ) -> Result<Vec<User>, DomainError> {
        authorize(Some(caller), Operation::ManageGroups)?;
        let role = Self::resolve_group(group_name)?;
        self.groups.members(role).await
    }

    pub async fn add_member(
        &self,
        caller: &CallerContext,
        group_name: &str,
        member: MemberRef,
    ) -> Result<User, DomainError> {
        authorize(Some(caller), Operation::ManageGroups)?;
        let role = Self::resolve_group(group_name)?;

        let user = match &member {
            MemberRef::Id(id) => self.users.find_by_id(*id).await?,
            MemberRef::Username(name) => self.users.find_by_username(name).await?,
        }
        .ok_or_else(|| DomainError::UserNotFound(member_label(&member)))?;

        if !self.groups.add_member(user.id, role).await? {
            return Err(DomainError::AlreadyInGroup);
        }
        info!(
            "User {} added to group '{}' by {}",
            user.id,
            role.display_name(),
            caller.user_id
        );
        Ok(user)
    }

    /// Checks run in order: user exists, user is a member, user is not the caller.
    pub async fn remove_member(
        &self,
        caller: &CallerContext,
        group_name: &str,
        user_id: EntityId,
    ) -> Result<(), DomainError> {
        authorize(Some(caller), Operation::ManageGroups)?;
        let role = Self::resolve_group(group_name)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id.to_string()))?;

        if !self.groups.is_member(user.id, role).await? {
            return Err(DomainError::NotInGroup);
        }
        if user.id == caller.user_id {
            warn!("User {} tried to remove themself from '{}'", caller.user_id, role.display_name());
            return Err(DomainError::SelfRemovalForbidden);
        }

        if !self.groups.remove_member(user.id, role).await? {
            return Err(DomainError::NotInGroup);
        }
        info!(
            "User {} removed from group '{}' by {}",
            user.id,
            role.display_name(),
            caller.user_id
        );
        Ok(())
    }
}

fn member_label(member: &MemberRef) -> String {
    match member {
        MemberRef::Id(id) => id.to_string(),
        MemberRef::Username(name) => name.clone(),
    }
}
