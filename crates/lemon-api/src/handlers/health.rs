use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    status: &'static str,
    store: &'static str,
}

pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// Pings the backing store.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let store = state.store.backend_name();
    match state.store.health_check().await {
        Ok(()) => (StatusCode::OK, Json(ReadinessResponse { status: "ready", store })),
        Err(e) => {
            tracing::error!("Readiness check failed for {} store: {}", store, e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse { status: "unavailable", store }),
            )
        }
    }
}
