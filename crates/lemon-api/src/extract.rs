//! Request extractors: JSON/query/path with API-shaped rejections, and the caller context.

use axum::extract::{FromRequest, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use lemon_core::domain::CallerContext;
use lemon_core::error::DomainError;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// An authenticated caller. Rejects with 401 when no valid token is presented.
pub struct Caller(pub CallerContext);

/// A caller on endpoints open to anonymous requests. A presented token must still be valid.
pub struct MaybeCaller(pub Option<CallerContext>);

impl MaybeCaller {
    pub fn context(&self) -> Option<&CallerContext> {
        self.0.as_ref()
    }
}

/// Accepts `Bearer <jwt>` and the `Token <jwt>` form older clients send.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, ApiError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| ApiError::Domain(DomainError::Unauthenticated))?;

    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("Token "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::Domain(DomainError::Unauthenticated))?;
    Ok(Some(token))
}

impl FromRequestParts<AppState> for MaybeCaller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => {
                let caller = state.services.auth.resolve_caller(token).await?;
                Ok(MaybeCaller(Some(caller)))
            }
            None => Ok(MaybeCaller(None)),
        }
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let MaybeCaller(caller) = MaybeCaller::from_request_parts(parts, state).await?;
        caller
            .map(Caller)
            .ok_or(ApiError::Domain(DomainError::Unauthenticated))
    }
}
