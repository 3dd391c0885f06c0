//! End-to-end HTTP tests for the contract lifecycle surface.
//!
//! The router is rebuilt per request via `build_test_app` (it is cheap and
//! `oneshot` consumes it), all sharing one pool per test.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, contract_body, get, post_json, seed_room, seed_user, send_json};
use rentora_core::role::Role;
use rentora_db::repositories::NotificationRepo;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Contract CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_contract_returns_201_with_data_envelope(pool: PgPool) {
    let room = seed_room(&pool, "101", 2).await;
    let tenant = seed_user(&pool, "Mara", Role::Guest).await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/contracts",
        &contract_body(room.id, tenant.id, 1, "pending"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["room_id"], room.id);
    assert_eq!(json["data"]["tenant_id"], tenant.id);
    assert_eq!(json["data"]["status"], "pending");

    // The new contract is visible through GET.
    let id = json["data"]["id"].as_i64().unwrap();
    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/contracts/{id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn get_missing_contract_returns_404(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/contracts/9999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_contracts_filters_by_room(pool: PgPool) {
    let room_a = seed_room(&pool, "102a", 2).await;
    let room_b = seed_room(&pool, "102b", 2).await;
    let tenant = seed_user(&pool, "Joris", Role::Guest).await;

    for room_id in [room_a.id, room_b.id] {
        let response = post_json(
            common::build_test_app(pool.clone()),
            "/api/v1/contracts",
            &contract_body(room_id, tenant.id, 1, "pending"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/contracts?room_id={}", room_a.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["room_id"], room_a.id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_create_body_returns_400(pool: PgPool) {
    let room = seed_room(&pool, "103", 2).await;
    let tenant = seed_user(&pool, "Nils", Role::Guest).await;

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/contracts",
        &contract_body(room.id, tenant.id, 0, "pending"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn patch_pending_contract_applies_fields(pool: PgPool) {
    let room = seed_room(&pool, "104", 3).await;
    let tenant = seed_user(&pool, "Iris", Role::Guest).await;

    let created = body_json(
        post_json(
            common::build_test_app(pool.clone()),
            "/api/v1/contracts",
            &contract_body(room.id, tenant.id, 1, "pending"),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = send_json(
        common::build_test_app(pool),
        Method::PATCH,
        &format!("/api/v1/contracts/{id}"),
        &json!({ "rental_price_cents": 99_000 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["rental_price_cents"], 99_000);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_active_contract_returns_409(pool: PgPool) {
    let room = seed_room(&pool, "105", 2).await;
    let tenant = seed_user(&pool, "Petra", Role::Guest).await;

    let created = body_json(
        post_json(
            common::build_test_app(pool.clone()),
            "/api/v1/contracts",
            &contract_body(room.id, tenant.id, 1, "active"),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = send_json(
        common::build_test_app(pool),
        Method::DELETE,
        &format!("/api/v1/contracts/{id}"),
        &json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_TRANSITION");
}

// ---------------------------------------------------------------------------
// Confirmation workflow
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn confirm_contract_activates_it(pool: PgPool) {
    let room = seed_room(&pool, "201", 2).await;
    let tenant = seed_user(&pool, "Owner", Role::Guest).await;

    let created = body_json(
        post_json(
            common::build_test_app(pool.clone()),
            "/api/v1/contracts",
            &contract_body(room.id, tenant.id, 1, "pending"),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/contracts/{id}/confirm"),
        &json!({ "tenant_id": tenant.id }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "active");

    // Room reflects the activation.
    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/rooms/{}/occupancy", room.id),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["current"], 1);
    assert_eq!(json["data"]["primary_tenant_id"], tenant.id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn confirm_by_wrong_user_returns_403(pool: PgPool) {
    let room = seed_room(&pool, "202", 2).await;
    let tenant = seed_user(&pool, "Owner", Role::Guest).await;
    let other = seed_user(&pool, "Other", Role::Guest).await;

    let created = body_json(
        post_json(
            common::build_test_app(pool.clone()),
            "/api/v1/contracts",
            &contract_body(room.id, tenant.id, 1, "pending"),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = post_json(
        common::build_test_app(pool),
        &format!("/api/v1/contracts/{id}/confirm"),
        &json!({ "tenant_id": other.id }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn over_capacity_activation_returns_409_with_details(pool: PgPool) {
    let room = seed_room(&pool, "203", 2).await;
    let a = seed_user(&pool, "Tenant A", Role::Guest).await;
    let b = seed_user(&pool, "Tenant B", Role::Guest).await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/contracts",
        &contract_body(room.id, a.id, 2, "active"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/contracts",
        &contract_body(room.id, b.id, 1, "active"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CAPACITY_EXCEEDED");
    assert_eq!(json["details"]["current"], 2);
    assert_eq!(json["details"]["capacity"], 2);
}

// ---------------------------------------------------------------------------
// Amendment workflow over HTTP
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn amendment_propose_accept_round_trip(pool: PgPool) {
    let room = seed_room(&pool, "301", 2).await;
    let operator = seed_user(&pool, "Op", Role::Operator).await;
    let tenant = seed_user(&pool, "Ten", Role::Guest).await;

    let created = body_json(
        post_json(
            common::build_test_app(pool.clone()),
            "/api/v1/contracts",
            &contract_body(room.id, tenant.id, 1, "active"),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/contracts/{id}/amendments"),
        &json!({
            "fields": { "rental_price_cents": 92_000 },
            "proposer_id": operator.id,
            "reason": "index adjustment",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(json["data"]["proposed_fields"]["rental_price_cents"], 92_000);

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/contracts/{id}/amendments/accept"),
        &json!({ "tenant_id": tenant.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "active");
    assert_eq!(json["data"]["rental_price_cents"], 92_000);

    // The decided proposal shows up in the audit history.
    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/contracts/{id}/amendments"),
    )
    .await;
    let json = body_json(response).await;
    let history = json["data"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["status"], "approved");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn amendment_proposed_by_tenant_returns_403(pool: PgPool) {
    let room = seed_room(&pool, "302", 2).await;
    let tenant = seed_user(&pool, "Ten", Role::Guest).await;

    let created = body_json(
        post_json(
            common::build_test_app(pool.clone()),
            "/api/v1/contracts",
            &contract_body(room.id, tenant.id, 1, "active"),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = post_json(
        common::build_test_app(pool),
        &format!("/api/v1/contracts/{id}/amendments"),
        &json!({
            "fields": { "rental_price_cents": 1 },
            "proposer_id": tenant.id,
            "reason": "self-serve",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Termination workflow over HTTP
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn termination_request_and_approve_round_trip(pool: PgPool) {
    let room = seed_room(&pool, "401", 2).await;
    let operator = seed_user(&pool, "Op", Role::Operator).await;
    let tenant = seed_user(&pool, "Ten", Role::Guest).await;

    let created = body_json(
        post_json(
            common::build_test_app(pool.clone()),
            "/api/v1/contracts",
            &contract_body(room.id, tenant.id, 2, "active"),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/contracts/{id}/termination/request"),
        &json!({ "requester_id": tenant.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "termination_requested_by_tenant");

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/contracts/{id}/termination/approve"),
        &json!({ "approver_id": operator.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "terminated");

    // The room is free again.
    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/rooms/{}/occupancy", room.id),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["current"], 0);
    assert!(json["data"]["primary_tenant_id"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn tenant_approving_own_termination_request_returns_403(pool: PgPool) {
    let room = seed_room(&pool, "402", 2).await;
    let tenant = seed_user(&pool, "Ten", Role::Guest).await;

    let created = body_json(
        post_json(
            common::build_test_app(pool.clone()),
            "/api/v1/contracts",
            &contract_body(room.id, tenant.id, 1, "active"),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/contracts/{id}/termination/request"),
        &json!({ "requester_id": tenant.id }),
    )
    .await;

    let response = post_json(
        common::build_test_app(pool),
        &format!("/api/v1/contracts/{id}/termination/approve"),
        &json!({ "approver_id": tenant.id }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Occupancy and notification endpoints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn occupancy_of_missing_room_returns_404(pool: PgPool) {
    let response = get(
        common::build_test_app(pool),
        "/api/v1/rooms/9999/occupancy",
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn notifications_list_and_mark_read(pool: PgPool) {
    let tenant = seed_user(&pool, "Reader", Role::Guest).await;

    let notification = NotificationRepo::insert(
        &pool,
        tenant.id,
        "contract.created",
        None,
        &json!({ "occupant_count": 1 }),
    )
    .await
    .unwrap();

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/users/{}/notifications?unread_only=true", tenant.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/notifications/{}/read", notification.id),
        &json!({ "user_id": tenant.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Mark-read is owner-scoped; a second attempt finds nothing unread.
    let response = post_json(
        common::build_test_app(pool),
        &format!("/api/v1/notifications/{}/read", notification.id),
        &json!({ "user_id": tenant.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
