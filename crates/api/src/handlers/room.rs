//! Handlers for the `/rooms` resource.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;

use rentora_core::types::DbId;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/v1/rooms/{id}/occupancy
///
/// Derived occupancy view: live in-force sum, configured capacity, and the
/// primary tenant. Computed on demand, never cached.
pub async fn room_occupancy(
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let occupancy = state.engine.room_occupancy(room_id).await?;
    Ok(Json(json!({ "data": occupancy })))
}
