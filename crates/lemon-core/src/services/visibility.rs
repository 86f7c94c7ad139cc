//! Order visibility filter

use crate::domain::{AccessLevel, CallerContext, OrderScope};

/// Maps the caller's access level to the orders they may see.
pub fn order_scope(caller: &CallerContext) -> OrderScope {
    match caller.access {
        AccessLevel::Admin | AccessLevel::Manager => OrderScope::All,
        AccessLevel::DeliveryCrew => OrderScope::AssignedTo(caller.user_id),
        AccessLevel::Customer => OrderScope::OwnedBy(caller.user_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, RoleSet};

    fn caller(user_id: i64, is_superuser: bool, roles: &[Role]) -> CallerContext {
        let roles: RoleSet = roles.iter().copied().collect();
        CallerContext {
            user_id,
            username: format!("user{}", user_id),
            is_superuser,
            access: AccessLevel::resolve(is_superuser, &roles),
            roles,
        }
    }

    #[test]
    fn test_scopes() {
        assert_eq!(order_scope(&caller(1, true, &[])), OrderScope::All);
        assert_eq!(order_scope(&caller(2, false, &[])), OrderScope::OwnedBy(2));
        assert_eq!(order_scope(&caller(3, false, &[Role::DeliveryCrew])), OrderScope::AssignedTo(3));
        assert_eq!(order_scope(&caller(4, false, &[Role::Manager])), OrderScope::All);
    }
}
