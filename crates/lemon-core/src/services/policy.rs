//! Authorization policy: which caller may perform which operation.

use tracing::warn;

use crate::domain::{AccessLevel, CallerContext};
use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// List categories and menu items, retrieve one menu item.
    BrowseCatalog,
    /// Create, update or delete categories and menu items.
    MutateCatalog,
    UseCart,
    PlaceOrder,
    ViewOrders,
    UpdateOrder,
    DeleteOrder,
    ManageGroups,
    ViewProfile,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::BrowseCatalog => "browse_catalog",
            Operation::MutateCatalog => "mutate_catalog",
            Operation::UseCart => "use_cart",
            Operation::PlaceOrder => "place_order",
            Operation::ViewOrders => "view_orders",
            Operation::UpdateOrder => "update_order",
            Operation::DeleteOrder => "delete_order",
            Operation::ManageGroups => "manage_groups",
            Operation::ViewProfile => "view_profile",
        }
    }

    fn requires_authentication(&self) -> bool {
        !matches!(self, Operation::BrowseCatalog)
    }
}

/// Allows or denies `operation` for `caller` (`None` for anonymous requests).
///
/// Anonymous callers get `Unauthenticated`; authenticated callers lacking the role get
/// `Forbidden`.
pub fn authorize(caller: Option<&CallerContext>, operation: Operation) -> Result<(), DomainError> {
    if !operation.requires_authentication() {
        return Ok(());
    }
    let caller = caller.ok_or(DomainError::Unauthenticated)?;

    let allowed = match operation {
        Operation::BrowseCatalog
        | Operation::UseCart
        | Operation::PlaceOrder
        | Operation::ViewOrders
        | Operation::ViewProfile => true,
        Operation::MutateCatalog | Operation::DeleteOrder | Operation::ManageGroups => {
            caller.is_manager()
        }
        Operation::UpdateOrder => caller.access != AccessLevel::Customer,
    };

    if allowed {
        Ok(())
    } else {
        warn!(
            "User {} ({:?}) denied {}",
            caller.user_id,
            caller.access,
            operation.as_str()
        );
        Err(DomainError::Forbidden(
            "You do not have permission to perform this action".to_string(),
        ))
    }
}
