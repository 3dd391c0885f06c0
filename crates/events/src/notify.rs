//! Best-effort in-app notification writer.
//!
//! [`NotificationWriter`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! and writes one notification row per recipient for every received
//! [`LifecycleEvent`]. Failures are logged and swallowed: notification
//! delivery must never affect the already-committed lifecycle transition.

use tokio::sync::broadcast;

use rentora_db::repositories::{NotificationRepo, UserRepo};
use rentora_db::DbPool;

use crate::bus::{LifecycleEvent, Recipient};

/// Background service that persists lifecycle events as notifications.
pub struct NotificationWriter;

impl NotificationWriter {
    /// Run the writer loop.
    ///
    /// Subscribes via the provided `receiver` and processes every event it
    /// receives. The loop exits when the channel is closed (i.e. the bus is
    /// dropped).
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<LifecycleEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::write(&pool, &event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            contract_id = event.contract_id,
                            "Failed to write notification"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Notification writer lagged, some events were not delivered"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification writer shutting down");
                    break;
                }
            }
        }
    }

    /// Resolve the event's recipients and insert one row per user.
    ///
    /// Rejection and deletion events arrive after their contract row is
    /// gone; those rows are stored without a contract reference.
    async fn write(pool: &DbPool, event: &LifecycleEvent) -> Result<(), sqlx::Error> {
        let user_ids = match event.recipient {
            Recipient::User(id) => vec![id],
            Recipient::Operators => UserRepo::list_operator_ids(pool).await?,
        };

        let contract_id = if Self::contract_exists(pool, event.contract_id).await? {
            Some(event.contract_id)
        } else {
            None
        };

        for user_id in user_ids {
            NotificationRepo::insert(pool, user_id, &event.event_type, contract_id, &event.payload)
                .await?;
        }
        Ok(())
    }

    async fn contract_exists(pool: &DbPool, contract_id: i64) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM contracts WHERE id = $1)")
            .bind(contract_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}
