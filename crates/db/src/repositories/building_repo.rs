//! Repository for the `buildings` table (seed/reference only).

use rentora_core::types::DbId;

use crate::models::building::Building;

pub struct BuildingRepo;

impl BuildingRepo {
    /// Insert a building, returning the created row.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        name: &str,
    ) -> Result<Building, sqlx::Error> {
        sqlx::query_as::<_, Building>(
            "INSERT INTO buildings (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(name)
        .fetch_one(executor)
        .await
    }

    /// Find a building by its ID.
    pub async fn find_by_id(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Building>, sqlx::Error> {
        sqlx::query_as::<_, Building>("SELECT id, name, created_at FROM buildings WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}
