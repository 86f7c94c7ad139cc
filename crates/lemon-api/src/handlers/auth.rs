// ============================================================================
// Lemon API - Auth Handlers
// File: crates/lemon-api/src/handlers/auth.rs
// ============================================================================
//! User registration, token login and the current-user profile

use axum::{extract::State, http::StatusCode, Json};
use lemon_core::domain::{AccessLevel, User};
use lemon_core::services::Registration;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::{ApiJson, Caller};
use crate::state::AppState;

/// Register request payload
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub auth_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: User,
    pub groups: Vec<&'static str>,
    pub access: AccessLevel,
}

/// Register handler - POST /auth/users/
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state
        .services
        .auth
        .register(Registration {
            username: payload.username,
            email: payload.email,
            password: payload.password,
            first_name: payload.first_name,
            last_name: payload.last_name,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Login handler - POST /auth/token/login/
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest("Username and password are required".to_string()));
    }

    let result = state
        .services
        .auth
        .login(&payload.username, &payload.password)
        .await?;
    Ok(Json(TokenResponse {
        auth_token: result.auth_token,
        token_type: "Bearer",
        expires_in: result.expires_in,
    }))
}

/// Current user - GET /auth/users/me/
pub async fn me(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<ProfileResponse>, ApiError> {
    let (user, roles) = state.services.auth.me(&caller).await?;
    Ok(Json(ProfileResponse {
        user,
        groups: roles.iter().map(|r| r.display_name()).collect(),
        access: caller.access,
    }))
}
