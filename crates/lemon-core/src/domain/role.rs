// ============================================================================
// Lemon Core - Roles
// File: crates/lemon-core/src/domain/role.rs
// Description: Group roles and the per-request access level derived from them
// ============================================================================

use std::collections::BTreeSet;

use lemon_shared::utils::capitalize;
use serde::{Deserialize, Serialize};

/// Role groups a user can belong to. A user with none is a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Manager,
    DeliveryCrew,
}

pub type RoleSet = BTreeSet<Role>;

/// Stored group names.
const GROUP_NAMES: [(Role, &str); 2] = [
    (Role::Manager, "Manager"),
    (Role::DeliveryCrew, "Delivery crew"),
];

impl Role {
    pub const ALL: [Role; 2] = [Role::Manager, Role::DeliveryCrew];

    pub fn display_name(&self) -> &'static str {
        GROUP_NAMES
            .iter()
            .find(|(role, _)| role == self)
            .map(|(_, name)| *name)
            .unwrap_or("")
    }

    pub fn from_display_name(name: &str) -> Option<Self> {
        GROUP_NAMES
            .iter()
            .find(|(_, display)| *display == name)
            .map(|(role, _)| *role)
    }

    /// Resolves a group name taken from a URL. Hyphens become spaces and the result is
    /// capitalized, so `delivery-crew` and `Delivery Crew` both name the delivery crew.
    pub fn from_group_name(raw: &str) -> Option<Self> {
        Self::from_display_name(&capitalize(&raw.trim().replace('-', " ")))
    }
}

/// Access level evaluated once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Admin,
    Manager,
    DeliveryCrew,
    Customer,
}

impl AccessLevel {
    /// Superuser first, then "no group", then delivery crew, and any other membership.
    pub fn resolve(is_superuser: bool, roles: &RoleSet) -> Self {
        if is_superuser {
            AccessLevel::Admin
        } else if roles.is_empty() {
            AccessLevel::Customer
        } else if roles.contains(&Role::DeliveryCrew) {
            AccessLevel::DeliveryCrew
        } else {
            AccessLevel::Manager
        }
    }
}
