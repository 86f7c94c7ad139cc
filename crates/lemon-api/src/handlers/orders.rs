// ============================================================================
// Lemon API - Order Handlers
// File: crates/lemon-api/src/handlers/orders.rs
// ============================================================================

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use lemon_core::domain::{Order, OrderChanges, OrderStatus, PlaceOrder};
use lemon_shared::{EntityId, Pagination};
use serde::{Deserialize, Deserializer};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery, Caller};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Body of PUT and PATCH. `"delivery_crew": null` unassigns the crew.
#[derive(Debug, Default, Deserialize)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    #[serde(default, alias = "delivery_crew_id", deserialize_with = "present")]
    pub delivery_crew: Option<Option<EntityId>>,
    pub date: Option<NaiveDate>,
}

/// Distinguishes an explicit `null` from an absent field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<OrderPatch> for OrderChanges {
    fn from(patch: OrderPatch) -> Self {
        OrderChanges {
            status: patch.status,
            delivery_crew_id: patch.delivery_crew,
            date: patch.date,
        }
    }
}

pub async fn list_orders(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let page = Pagination::new(params.page, params.per_page);
    Ok(Json(state.services.orders.list_orders(&caller, page).await?))
}

/// The body is optional; an empty POST places the order for today.
pub async fn place_order(
    State(state): State<AppState>,
    Caller(caller): Caller,
    body: Bytes,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        PlaceOrder::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?
    };

    let order = state.services.orders.place_order(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get_order(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.services.orders.get_order(&caller, id).await?))
}

pub async fn update_order(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiPath(id): ApiPath<EntityId>,
    ApiJson(payload): ApiJson<OrderPatch>,
) -> Result<Json<Order>, ApiError> {
    let updated = state
        .services
        .orders
        .update_order(&caller, id, payload.into())
        .await?;
    Ok(Json(updated))
}

pub async fn delete_order(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<StatusCode, ApiError> {
    state.services.orders.delete_order(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
