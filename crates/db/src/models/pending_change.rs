//! Pending-change (amendment) entity model.

use serde::Serialize;
use sqlx::FromRow;

use rentora_core::change::ChangeStatus;
use rentora_core::types::{DbId, Timestamp};

/// A row from the `pending_changes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PendingChange {
    pub id: DbId,
    pub contract_id: DbId,
    /// Serialized `ContractPatch`: only the proposed fields are present.
    pub proposed_fields: serde_json::Value,
    pub proposer_id: DbId,
    pub reason: String,
    #[sqlx(try_from = "String")]
    pub status: ChangeStatus,
    pub created_at: Timestamp,
    pub decided_at: Option<Timestamp>,
}
