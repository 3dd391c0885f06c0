//! Repository for the `notifications` table.

use rentora_core::types::DbId;

use crate::models::notification::Notification;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, event_type, contract_id, payload, is_read, read_at, created_at";

pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert a notification row, returning it.
    pub async fn insert(
        executor: impl sqlx::PgExecutor<'_>,
        user_id: DbId,
        event_type: &str,
        contract_id: Option<DbId>,
        payload: &serde_json::Value,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (user_id, event_type, contract_id, payload)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(event_type)
            .bind(contract_id)
            .bind(payload)
            .fetch_one(executor)
            .await
    }

    /// List a user's notifications, newest first.
    pub async fn list_for_user(
        executor: impl sqlx::PgExecutor<'_>,
        user_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications
             WHERE user_id = $1 AND (NOT $2 OR is_read = FALSE)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(unread_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    /// Mark a notification as read, scoped to its owner. Returns `true` if a
    /// row was updated.
    pub async fn mark_read(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = NOW()
             WHERE id = $1 AND user_id = $2 AND is_read = FALSE",
        )
        .bind(id)
        .bind(user_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
