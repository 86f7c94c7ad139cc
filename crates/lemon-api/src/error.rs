//! HTTP mapping of domain and extractor errors

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lemon_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

impl ApiError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        let domain = match self {
            ApiError::BadRequest(_) => return (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Domain(e) => e,
        };

        match domain {
            DomainError::GroupNotFound(_) => (StatusCode::NOT_FOUND, "GROUP_NOT_FOUND"),
            DomainError::UserNotFound(_) => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
            DomainError::CategoryNotFound(_) => (StatusCode::NOT_FOUND, "CATEGORY_NOT_FOUND"),
            DomainError::MenuItemNotFound(_) => (StatusCode::NOT_FOUND, "MENU_ITEM_NOT_FOUND"),
            DomainError::OrderNotFound(_) => (StatusCode::NOT_FOUND, "ORDER_NOT_FOUND"),

            DomainError::NotInGroup => (StatusCode::BAD_REQUEST, "NOT_IN_GROUP"),
            DomainError::AlreadyInGroup => (StatusCode::BAD_REQUEST, "ALREADY_IN_GROUP"),
            DomainError::SelfRemovalForbidden => (StatusCode::FORBIDDEN, "SELF_REMOVAL_FORBIDDEN"),
            DomainError::DuplicateCartItem(_) => (StatusCode::BAD_REQUEST, "DUPLICATE_CART_ITEM"),
            DomainError::CategorySlugAlreadyExists(_) => (StatusCode::BAD_REQUEST, "DUPLICATE_SLUG"),
            DomainError::CategoryInUse(_) => (StatusCode::BAD_REQUEST, "CATEGORY_IN_USE"),
            DomainError::MenuItemInUse(_) => (StatusCode::BAD_REQUEST, "MENU_ITEM_IN_USE"),
            DomainError::UsernameAlreadyExists(_) => (StatusCode::BAD_REQUEST, "DUPLICATE_USERNAME"),
            DomainError::EmptyCart => (StatusCode::BAD_REQUEST, "EMPTY_CART"),

            DomainError::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            DomainError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            DomainError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),

            DomainError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            DomainError::PasswordTooShort | DomainError::PasswordTooLong => {
                (StatusCode::BAD_REQUEST, "WEAK_PASSWORD")
            }

            DomainError::PasswordHashError(_)
            | DomainError::TokenGenerationError(_)
            | DomainError::DatabaseError(_)
            | DomainError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Store and driver details stay in the logs.
        let message = if status.is_server_error() {
            tracing::error!("{}: {}", code, self);
            "Internal server error".to_string()
        } else {
            tracing::warn!("{} {}: {}", status.as_u16(), code, self);
            client_message(&self)
        };

        (status, Json(ErrorResponse { error: message, code })).into_response()
    }
}

/// Messages for the group endpoints match the wording clients already rely on.
fn client_message(error: &ApiError) -> String {
    match error {
        ApiError::Domain(DomainError::GroupNotFound(_)) => "Group does not exist".to_string(),
        ApiError::Domain(DomainError::UserNotFound(_)) => "User does not exist".to_string(),
        ApiError::Domain(DomainError::Forbidden(msg)) => msg.clone(),
        ApiError::Domain(DomainError::ValidationError(msg)) => msg.clone(),
        other => other.to_string(),
    }
}
