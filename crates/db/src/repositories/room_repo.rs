//! Repository for the `rooms` table.

use rentora_core::room::RoomStatus;
use rentora_core::types::DbId;

use crate::models::room::{CreateRoom, Room};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, building_id, label, capacity, status, created_at, updated_at";

pub struct RoomRepo;

impl RoomRepo {
    /// Insert a new room (starts vacant), returning the created row.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        input: &CreateRoom,
    ) -> Result<Room, sqlx::Error> {
        let query = format!(
            "INSERT INTO rooms (building_id, label, capacity)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(input.building_id)
            .bind(&input.label)
            .bind(input.capacity)
            .fetch_one(executor)
            .await
    }

    /// Find a room by its ID.
    pub async fn find_by_id(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms WHERE id = $1");
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a room and take a row lock on it for the rest of the
    /// transaction.
    ///
    /// Every lifecycle operation that reads-then-writes occupancy locks the
    /// room first, serializing concurrent operations per room.
    pub async fn find_by_id_for_update(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Set a room's status. Returns the updated row.
    pub async fn set_status(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        status: RoomStatus,
    ) -> Result<Room, sqlx::Error> {
        let query = format!(
            "UPDATE rooms SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(executor)
            .await
    }
}
