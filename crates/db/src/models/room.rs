//! Room entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use rentora_core::room::RoomStatus;
use rentora_core::types::{DbId, Timestamp};

/// A row from the `rooms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Room {
    pub id: DbId,
    pub building_id: DbId,
    pub label: String,
    /// Maximum simultaneous occupants across all in-force contracts.
    pub capacity: i32,
    #[sqlx(try_from = "String")]
    pub status: RoomStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for seeding a room.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoom {
    pub building_id: DbId,
    pub label: String,
    pub capacity: i32,
}

/// Derived occupancy view returned by `GET /rooms/{id}/occupancy`.
#[derive(Debug, Clone, Serialize)]
pub struct RoomOccupancy {
    /// SUM of occupant_count over in-force contracts, computed on demand.
    pub current: i64,
    pub capacity: i32,
    /// Tenant on the earliest-created ACTIVE contract, if any.
    pub primary_tenant_id: Option<DbId>,
}
