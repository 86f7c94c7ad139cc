#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use lemon_api::{build_router, AppState};
use lemon_core::domain::{NewUser, Role, User};
use lemon_core::repositories::Repositories;
use lemon_infrastructure::memory_repositories;
use lemon_security::JwtService;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub repos: Repositories,
    pub jwt: Arc<JwtService>,
}

impl TestApp {
    pub fn new() -> Self {
        let repos = memory_repositories();
        let jwt = Arc::new(JwtService::new("http-test-secret", 3600));
        let router = build_router(AppState::new(&repos, jwt.clone()));
        Self { router, repos, jwt }
    }

    /// Creates a user directly in the store (skips Argon2) and returns it with a token.
    pub async fn user(&self, username: &str, roles: &[Role]) -> (User, String) {
        let new_user =
            NewUser::new(username.to_string(), None, None, None, "unused".to_string()).expect("user");
        let user = self.repos.users.create(&new_user).await.expect("create user");
        for role in roles {
            self.repos.groups.add_member(user.id, *role).await.expect("membership");
        }
        let token = self.jwt.generate_access_token(user.id).expect("token");
        (user, token)
    }

    pub async fn superuser(&self, username: &str) -> (User, String) {
        let new_user = NewUser::new(username.to_string(), None, None, None, "unused".to_string())
            .expect("user")
            .superuser();
        let user = self.repos.users.create(&new_user).await.expect("create user");
        let token = self.jwt.generate_access_token(user.id).expect("token");
        (user, token)
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        (status, read_json(response).await)
    }
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    if bytes.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(&bytes).expect("json")
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}
