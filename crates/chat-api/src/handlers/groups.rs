//! Group handlers

use axum::{extract::State, Json};
use chat_core::GroupSummary;

use crate::extractors::AuthUser;
use crate::response::ApiResult;
use crate::state::ApiState;

/// List every public group
///
/// GET /groups/public
pub async fn get_public_groups(
    State(state): State<ApiState>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<GroupSummary>>> {
    let groups = state.accounts().public_groups().await?;
    Ok(Json(groups))
}
