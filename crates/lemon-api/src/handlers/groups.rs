// ============================================================================
// Lemon API - Group Membership Handlers
// File: crates/lemon-api/src/handlers/groups.rs
// ============================================================================

use axum::{extract::State, http::StatusCode, Json};
use lemon_core::domain::User;
use lemon_core::services::MemberRef;
use lemon_shared::EntityId;
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, Caller};
use crate::response::MessageResponse;
use crate::state::AppState;

/// Either field names the user; `user_id` wins when both are sent.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    #[serde(default)]
    pub user_id: Option<EntityId>,
    #[serde(default)]
    pub username: Option<String>,
}

impl AddMemberRequest {
    fn member_ref(self) -> Result<MemberRef, ApiError> {
        match (self.user_id, self.username) {
            (Some(id), _) => Ok(MemberRef::Id(id)),
            (None, Some(name)) if !name.trim().is_empty() => {
                Ok(MemberRef::Username(name.trim().to_string()))
            }
            _ => Err(ApiError::BadRequest("user_id or username is required".to_string())),
        }
    }
}

pub async fn list_members(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiPath(group_name): ApiPath<String>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.services.groups.list_members(&caller, &group_name).await?;
    Ok(Json(users))
}

pub async fn add_member(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiPath(group_name): ApiPath<String>,
    ApiJson(payload): ApiJson<AddMemberRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let member = payload.member_ref()?;
    let user = state
        .services
        .groups
        .add_member(&caller, &group_name, member)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn remove_member(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiPath((group_name, user_id)): ApiPath<(String, EntityId)>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .services
        .groups
        .remove_member(&caller, &group_name, user_id)
        .await?;
    Ok(Json(MessageResponse::new("User removed from group successfully")))
}
