use axum::{extract::State, http::StatusCode, Json};
use lemon_core::domain::CartLine;
use lemon_shared::EntityId;
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::{ApiJson, Caller};
use crate::response::MessageResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    #[serde(alias = "menuitem")]
    pub menu_item_id: EntityId,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

pub async fn list_cart(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<Vec<CartLine>>, ApiError> {
    Ok(Json(state.services.cart.list(&caller).await?))
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiJson(payload): ApiJson<AddToCartRequest>,
) -> Result<(StatusCode, Json<CartLine>), ApiError> {
    let line = state
        .services
        .cart
        .add(&caller, payload.menu_item_id, payload.quantity)
        .await?;
    Ok((StatusCode::CREATED, Json(line)))
}

pub async fn clear_cart(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<MessageResponse>, ApiError> {
    state.services.cart.clear(&caller).await?;
    Ok(Json(MessageResponse::new("Cart cleared successfully")))
}
