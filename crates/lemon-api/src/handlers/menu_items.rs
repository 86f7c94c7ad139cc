// ============================================================================
// Lemon API - Menu Item Handlers
// File: crates/lemon-api/src/handlers/menu_items.rs
// ============================================================================

use axum::{extract::State, http::StatusCode, Json};
use lemon_core::domain::{MenuItem, MenuItemChanges, MenuItemOrdering, MenuItemQuery, NewMenuItem};
use lemon_core::error::DomainError;
use lemon_core::services::{authorize, Operation};
use lemon_shared::{EntityId, Pagination};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery, MaybeCaller};
use crate::state::AppState;

/// Query string of `GET /api/menu-items/`
#[derive(Debug, Default, Deserialize)]
pub struct MenuItemParams {
    pub title: Option<String>,
    pub price: Option<Decimal>,
    /// Category slug
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub search: Option<String>,
    /// e.g. `price,-inventory`
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl MenuItemParams {
    pub fn into_query(self) -> Result<MenuItemQuery, DomainError> {
        let ordering = match self.ordering.as_deref() {
            Some(raw) => MenuItemOrdering::parse_list(raw)?,
            None => Vec::new(),
        };
        Ok(MenuItemQuery {
            title: self.title,
            price: self.price,
            category: self.category,
            featured: self.featured,
            search: self.search.filter(|s| !s.trim().is_empty()),
            ordering,
            pagination: Pagination::new(self.page, self.per_page),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct MenuItemRequest {
    pub title: String,
    pub price: Decimal,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub inventory: i32,
    #[serde(alias = "category")]
    pub category_id: EntityId,
}

/// Body of PUT and PATCH; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct MenuItemPatch {
    pub title: Option<String>,
    pub price: Option<Decimal>,
    pub featured: Option<bool>,
    pub inventory: Option<i32>,
    #[serde(alias = "category")]
    pub category_id: Option<EntityId>,
}

impl From<MenuItemPatch> for MenuItemChanges {
    fn from(patch: MenuItemPatch) -> Self {
        MenuItemChanges {
            title: patch.title,
            price: patch.price,
            featured: patch.featured,
            inventory: patch.inventory,
            category_id: patch.category_id,
        }
    }
}

pub async fn list_menu_items(
    State(state): State<AppState>,
    caller: MaybeCaller,
    ApiQuery(params): ApiQuery<MenuItemParams>,
) -> Result<Json<Vec<MenuItem>>, ApiError> {
    let query = params.into_query()?;
    let items = state
        .services
        .catalog
        .list_menu_items(caller.context(), &query)
        .await?;
    Ok(Json(items))
}

pub async fn create_menu_item(
    State(state): State<AppState>,
    caller: MaybeCaller,
    ApiJson(payload): ApiJson<MenuItemRequest>,
) -> Result<(StatusCode, Json<MenuItem>), ApiError> {
    authorize(caller.context(), Operation::MutateCatalog)?;
    let item = NewMenuItem::new(
        payload.title,
        payload.price,
        payload.featured,
        payload.inventory,
        payload.category_id,
    )?;
    let created = state
        .services
        .catalog
        .create_menu_item(caller.context(), item)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_menu_item(
    State(state): State<AppState>,
    caller: MaybeCaller,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<Json<MenuItem>, ApiError> {
    let item = state.services.catalog.get_menu_item(caller.context(), id).await?;
    Ok(Json(item))
}

pub async fn update_menu_item(
    State(state): State<AppState>,
    caller: MaybeCaller,
    ApiPath(id): ApiPath<EntityId>,
    ApiJson(payload): ApiJson<MenuItemPatch>,
) -> Result<Json<MenuItem>, ApiError> {
    let updated = state
        .services
        .catalog
        .update_menu_item(caller.context(), id, payload.into())
        .await?;
    Ok(Json(updated))
}

pub async fn delete_menu_item(
    State(state): State<AppState>,
    caller: MaybeCaller,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<StatusCode, ApiError> {
    state.services.catalog.delete_menu_item(caller.context(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
