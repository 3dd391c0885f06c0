//! Route definitions for the `/contracts` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::contract;
use crate::state::AppState;

/// Routes mounted at `/contracts`.
///
/// ```text
/// GET    /                           -> list_contracts
/// POST   /                           -> create_contract
/// GET    /{id}                       -> get_contract
/// PATCH  /{id}                       -> update_contract
/// DELETE /{id}                       -> delete_contract
///
/// POST   /{id}/confirm               -> confirm_contract
/// POST   /{id}/reject                -> reject_contract
///
/// GET    /{id}/amendments            -> list_amendments
/// POST   /{id}/amendments            -> propose_amendment
/// POST   /{id}/amendments/accept     -> accept_amendment
/// POST   /{id}/amendments/decline    -> decline_amendment
///
/// POST   /{id}/termination/request   -> request_termination
/// POST   /{id}/termination/approve   -> approve_termination
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(contract::list_contracts).post(contract::create_contract),
        )
        .route(
            "/{id}",
            get(contract::get_contract)
                .patch(contract::update_contract)
                .delete(contract::delete_contract),
        )
        // Confirmation workflow
        .route("/{id}/confirm", post(contract::confirm_contract))
        .route("/{id}/reject", post(contract::reject_contract))
        // Amendment workflow
        .route(
            "/{id}/amendments",
            get(contract::list_amendments).post(contract::propose_amendment),
        )
        .route("/{id}/amendments/accept", post(contract::accept_amendment))
        .route(
            "/{id}/amendments/decline",
            post(contract::decline_amendment),
        )
        // Termination workflow
        .route(
            "/{id}/termination/request",
            post(contract::request_termination),
        )
        .route(
            "/{id}/termination/approve",
            post(contract::approve_termination),
        )
}
