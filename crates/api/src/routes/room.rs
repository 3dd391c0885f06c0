//! Route definitions for the `/rooms` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::room;
use crate::state::AppState;

/// Routes mounted at `/rooms`.
///
/// ```text
/// GET /{id}/occupancy -> room_occupancy
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/occupancy", get(room::room_occupancy))
}
