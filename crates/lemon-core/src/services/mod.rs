//! Domain services (business logic)

use std::sync::Arc;

use lemon_security::JwtService;

use crate::repositories::Repositories;

pub mod auth_service;
pub mod cart_service;
pub mod catalog_service;
pub mod checkout;
pub mod group_service;
pub mod order_service;
pub mod policy;
pub mod visibility;

pub use auth_service::{AuthService, LoginResult, Registration};
pub use cart_service::CartService;
pub use catalog_service::CatalogService;
pub use group_service::{GroupService, MemberRef};
pub use order_service::OrderService;
pub use policy::{authorize, Operation};

/// Every service, wired against one set of repositories.
#[derive(Clone)]
pub struct Services {
    pub catalog: Arc<CatalogService>,
    pub cart: Arc<CartService>,
    pub orders: Arc<OrderService>,
    pub groups: Arc<GroupService>,
    pub auth: Arc<AuthService>,
}

impl Services {
    pub fn new(repos: &Repositories, jwt: Arc<JwtService>) -> Self {
        Self {
            catalog: Arc::new(CatalogService::new(
                repos.categories.clone(),
                repos.menu_items.clone(),
            )),
            cart: Arc::new(CartService::new(repos.cart.clone(), repos.menu_items.clone())),
            orders: Arc::new(OrderService::new(repos.orders.clone(), repos.groups.clone())),
            groups: Arc::new(GroupService::new(repos.groups.clone(), repos.users.clone())),
            auth: Arc::new(AuthService::new(repos.users.clone(), repos.groups.clone(), jwt)),
        }
    }
}
