//! Route definitions for notification endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Notification routes, merged at the `/api/v1` root.
///
/// ```text
/// GET  /users/{id}/notifications -> list_notifications
/// POST /notifications/{id}/read  -> mark_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/users/{id}/notifications",
            get(notification::list_notifications),
        )
        .route("/notifications/{id}/read", post(notification::mark_read))
}
