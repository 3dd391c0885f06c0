//! Shared fixtures for lifecycle engine integration tests.

use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::PgPool;

use rentora_core::contract::ContractStatus;
use rentora_core::role::Role;
use rentora_core::types::DbId;
use rentora_db::models::contract::CreateContract;
use rentora_db::models::room::{CreateRoom, Room};
use rentora_db::models::user::{CreateUser, User};
use rentora_db::repositories::{BuildingRepo, RoomRepo, UserRepo};
use rentora_events::EventBus;
use rentora_lifecycle::LifecycleEngine;

pub fn engine(pool: &PgPool) -> LifecycleEngine {
    LifecycleEngine::new(pool.clone(), Arc::new(EventBus::default()))
}

/// Create a building and a room with the given capacity.
pub async fn seed_room(pool: &PgPool, label: &str, capacity: i32) -> Room {
    let building = BuildingRepo::create(pool, &format!("Building {label}"))
        .await
        .unwrap();
    RoomRepo::create(
        pool,
        &CreateRoom {
            building_id: building.id,
            label: label.to_string(),
            capacity,
        },
    )
    .await
    .unwrap()
}

pub async fn seed_user(pool: &PgPool, name: &str, role: Role) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            display_name: name.to_string(),
            email: format!("{}@example.test", name.to_lowercase().replace(' ', ".")),
            role: Some(role),
        },
    )
    .await
    .unwrap()
}

pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

pub fn new_contract(
    room_id: DbId,
    tenant_id: DbId,
    occupant_count: i32,
    status: ContractStatus,
) -> CreateContract {
    CreateContract {
        room_id,
        tenant_id,
        occupant_count,
        rental_price_cents: 85_000,
        start_date: date("2026-09-01"),
        end_date: date("2027-08-31"),
        status: Some(status),
    }
}
