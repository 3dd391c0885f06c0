//! Repository for the `users` table.

use rentora_core::role::Role;
use rentora_core::types::DbId;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, display_name, email, role, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Insert a user, returning the created row. Role defaults to guest.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        input: &CreateUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (display_name, email, role)
             VALUES ($1, $2, COALESCE($3, 'guest'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.display_name)
            .bind(&input.email)
            .bind(input.role.map(Role::as_str))
            .fetch_one(executor)
            .await
    }

    /// Find a user by their ID.
    pub async fn find_by_id(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Set a user's role. Returns the updated row.
    pub async fn set_role(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        role: Role,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "UPDATE users SET role = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(role.as_str())
            .fetch_one(executor)
            .await
    }

    /// IDs of all operator accounts (notification fan-out target).
    pub async fn list_operator_ids(
        executor: impl sqlx::PgExecutor<'_>,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> =
            sqlx::query_as("SELECT id FROM users WHERE role = 'operator' ORDER BY id")
                .fetch_all(executor)
                .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }
}
