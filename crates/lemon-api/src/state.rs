use std::sync::Arc;

use lemon_core::repositories::{Repositories, StoreHealth};
use lemon_core::services::Services;
use lemon_security::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub store: Arc<dyn StoreHealth>,
}

impl AppState {
    pub fn new(repos: &Repositories, jwt: Arc<JwtService>) -> Self {
        Self {
            services: Services::new(repos, jwt),
            store: repos.health.clone(),
        }
    }
}
