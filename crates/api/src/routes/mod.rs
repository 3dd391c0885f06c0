pub mod contract;
pub mod health;
pub mod notification;
pub mod room;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /contracts                                 list, create
/// /contracts/{id}                            get, patch, delete
/// /contracts/{id}/confirm                    tenant confirmation (POST)
/// /contracts/{id}/reject                     tenant rejection (POST)
/// /contracts/{id}/amendments                 history, propose (GET, POST)
/// /contracts/{id}/amendments/accept          tenant accept (POST)
/// /contracts/{id}/amendments/decline         tenant decline (POST)
/// /contracts/{id}/termination/request        open request (POST)
/// /contracts/{id}/termination/approve        counterparty approval (POST)
///
/// /rooms/{id}/occupancy                      derived occupancy view (GET)
///
/// /users/{id}/notifications                  list (?unread_only, limit, offset)
/// /notifications/{id}/read                   mark read (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Contract lifecycle: CRUD plus the two-party workflows.
        .nest("/contracts", contract::router())
        // Derived room occupancy.
        .nest("/rooms", room::router())
        // In-app notifications written by the event pipeline.
        .merge(notification::router())
}
