//! Handlers for the `/contracts` resource.
//!
//! Every state-changing endpoint delegates to the lifecycle engine; the
//! handlers only parse input and shape the response. Actor ids travel in
//! request bodies and the engine's standing checks decide who may act.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use rentora_core::change::ContractPatch;
use rentora_core::error::CoreError;
use rentora_core::types::DbId;
use rentora_db::models::contract::{ContractFilter, CreateContract};
use rentora_db::repositories::{ContractRepo, PendingChangeRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body for `POST /contracts/{id}/confirm`, `/reject`, `/amendments/accept`,
/// and `/amendments/decline`.
#[derive(Debug, Deserialize)]
pub struct TenantAction {
    pub tenant_id: DbId,
}

/// Body for `POST /contracts/{id}/amendments`.
#[derive(Debug, Deserialize)]
pub struct ProposeAmendment {
    pub fields: ContractPatch,
    pub proposer_id: DbId,
    pub reason: String,
}

/// Body for `POST /contracts/{id}/termination/request`.
#[derive(Debug, Deserialize)]
pub struct RequestTermination {
    pub requester_id: DbId,
}

/// Body for `POST /contracts/{id}/termination/approve`.
#[derive(Debug, Deserialize)]
pub struct ApproveTermination {
    pub approver_id: DbId,
}

// ---------------------------------------------------------------------------
// Contract CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/contracts
///
/// Create a contract in PENDING (default) or directly ACTIVE state.
pub async fn create_contract(
    State(state): State<AppState>,
    Json(input): Json<CreateContract>,
) -> AppResult<impl IntoResponse> {
    let contract = state.engine.create_contract(&input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "data": contract }))))
}

/// GET /api/v1/contracts/{id}
pub async fn get_contract(
    State(state): State<AppState>,
    Path(contract_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let contract = ContractRepo::find_by_id(&state.pool, contract_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contract",
            id: contract_id,
        }))?;
    Ok(Json(json!({ "data": contract })))
}

/// GET /api/v1/contracts?room_id=&tenant_id=
pub async fn list_contracts(
    State(state): State<AppState>,
    Query(filter): Query<ContractFilter>,
) -> AppResult<Json<serde_json::Value>> {
    let contracts = ContractRepo::list(&state.pool, &filter).await?;
    Ok(Json(json!({ "data": contracts })))
}

/// PATCH /api/v1/contracts/{id}
///
/// Direct field edit; only legal while the contract is PENDING.
pub async fn update_contract(
    State(state): State<AppState>,
    Path(contract_id): Path<DbId>,
    Json(patch): Json<ContractPatch>,
) -> AppResult<Json<serde_json::Value>> {
    let contract = state.engine.update_contract(contract_id, &patch).await?;
    Ok(Json(json!({ "data": contract })))
}

/// DELETE /api/v1/contracts/{id}
///
/// Only PENDING and terminal contracts may be deleted.
pub async fn delete_contract(
    State(state): State<AppState>,
    Path(contract_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    state.engine.delete_contract(contract_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Confirmation
// ---------------------------------------------------------------------------

/// POST /api/v1/contracts/{id}/confirm
pub async fn confirm_contract(
    State(state): State<AppState>,
    Path(contract_id): Path<DbId>,
    Json(body): Json<TenantAction>,
) -> AppResult<Json<serde_json::Value>> {
    let contract = state
        .engine
        .confirm_contract(contract_id, body.tenant_id)
        .await?;
    Ok(Json(json!({ "data": contract })))
}

/// POST /api/v1/contracts/{id}/reject
pub async fn reject_contract(
    State(state): State<AppState>,
    Path(contract_id): Path<DbId>,
    Json(body): Json<TenantAction>,
) -> AppResult<impl IntoResponse> {
    state
        .engine
        .reject_contract(contract_id, body.tenant_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Amendments
// ---------------------------------------------------------------------------

/// POST /api/v1/contracts/{id}/amendments
pub async fn propose_amendment(
    State(state): State<AppState>,
    Path(contract_id): Path<DbId>,
    Json(body): Json<ProposeAmendment>,
) -> AppResult<impl IntoResponse> {
    let change = state
        .engine
        .propose_amendment(contract_id, &body.fields, body.proposer_id, &body.reason)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "data": change }))))
}

/// GET /api/v1/contracts/{id}/amendments
///
/// Full amendment history, newest first, including superseded and decided
/// rows.
pub async fn list_amendments(
    State(state): State<AppState>,
    Path(contract_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    ContractRepo::find_by_id(&state.pool, contract_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contract",
            id: contract_id,
        }))?;
    let changes = PendingChangeRepo::list_for_contract(&state.pool, contract_id).await?;
    Ok(Json(json!({ "data": changes })))
}

/// POST /api/v1/contracts/{id}/amendments/accept
pub async fn accept_amendment(
    State(state): State<AppState>,
    Path(contract_id): Path<DbId>,
    Json(body): Json<TenantAction>,
) -> AppResult<Json<serde_json::Value>> {
    let contract = state
        .engine
        .accept_amendment(contract_id, body.tenant_id)
        .await?;
    Ok(Json(json!({ "data": contract })))
}

/// POST /api/v1/contracts/{id}/amendments/decline
pub async fn decline_amendment(
    State(state): State<AppState>,
    Path(contract_id): Path<DbId>,
    Json(body): Json<TenantAction>,
) -> AppResult<Json<serde_json::Value>> {
    let contract = state
        .engine
        .decline_amendment(contract_id, body.tenant_id)
        .await?;
    Ok(Json(json!({ "data": contract })))
}

// ---------------------------------------------------------------------------
// Termination
// ---------------------------------------------------------------------------

/// POST /api/v1/contracts/{id}/termination/request
pub async fn request_termination(
    State(state): State<AppState>,
    Path(contract_id): Path<DbId>,
    Json(body): Json<RequestTermination>,
) -> AppResult<Json<serde_json::Value>> {
    let contract = state
        .engine
        .request_termination(contract_id, body.requester_id)
        .await?;
    Ok(Json(json!({ "data": contract })))
}

/// POST /api/v1/contracts/{id}/termination/approve
pub async fn approve_termination(
    State(state): State<AppState>,
    Path(contract_id): Path<DbId>,
    Json(body): Json<ApproveTermination>,
) -> AppResult<Json<serde_json::Value>> {
    let contract = state
        .engine
        .approve_termination(contract_id, body.approver_id)
        .await?;
    Ok(Json(json!({ "data": contract })))
}
