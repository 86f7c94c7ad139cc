use axum::{extract::State, http::StatusCode, Json};
use lemon_core::domain::{Category, NewCategory};
use lemon_core::services::{authorize, Operation};
use lemon_shared::EntityId;
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, MaybeCaller};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
}

pub async fn list_categories(
    State(state): State<AppState>,
    caller: MaybeCaller,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state.services.catalog.list_categories(caller.context()).await?;
    Ok(Json(categories))
}

pub async fn create_category(
    State(state): State<AppState>,
    caller: MaybeCaller,
    ApiJson(payload): ApiJson<CategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    authorize(caller.context(), Operation::MutateCatalog)?;
    let category = NewCategory::new(payload.title, payload.slug)?;
    let created = state
        .services
        .catalog
        .create_category(caller.context(), category)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_category(
    State(state): State<AppState>,
    caller: MaybeCaller,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<StatusCode, ApiError> {
    state.services.catalog.delete_category(caller.context(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
