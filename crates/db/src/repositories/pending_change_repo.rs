//! Repository for the `pending_changes` table.

use rentora_core::change::{ChangeStatus, ContractPatch};
use rentora_core::types::DbId;

use crate::models::pending_change::PendingChange;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, contract_id, proposed_fields, proposer_id, reason, status, created_at, decided_at";

pub struct PendingChangeRepo;

impl PendingChangeRepo {
    /// Insert a new PENDING change, returning the created row.
    ///
    /// Fails with a unique violation if a live change already exists for the
    /// contract; callers supersede the old one first.
    pub async fn insert(
        executor: impl sqlx::PgExecutor<'_>,
        contract_id: DbId,
        patch: &ContractPatch,
        proposer_id: DbId,
        reason: &str,
    ) -> Result<PendingChange, sqlx::Error> {
        let proposed = serde_json::to_value(patch)
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        let query = format!(
            "INSERT INTO pending_changes (contract_id, proposed_fields, proposer_id, reason)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PendingChange>(&query)
            .bind(contract_id)
            .bind(proposed)
            .bind(proposer_id)
            .bind(reason)
            .fetch_one(executor)
            .await
    }

    /// The live (PENDING) change for a contract, if one exists.
    pub async fn find_pending_for_contract(
        executor: impl sqlx::PgExecutor<'_>,
        contract_id: DbId,
    ) -> Result<Option<PendingChange>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pending_changes
             WHERE contract_id = $1 AND status = 'pending'"
        );
        sqlx::query_as::<_, PendingChange>(&query)
            .bind(contract_id)
            .fetch_optional(executor)
            .await
    }

    /// Mark any live change for the contract as SUPERSEDED. Returns the
    /// number of rows affected (0 or 1, given the partial unique index).
    pub async fn supersede_pending(
        executor: impl sqlx::PgExecutor<'_>,
        contract_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE pending_changes
             SET status = 'superseded', decided_at = NOW()
             WHERE contract_id = $1 AND status = 'pending'",
        )
        .bind(contract_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Record the tenant's decision on a change (APPROVED or REJECTED).
    pub async fn decide(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        status: ChangeStatus,
    ) -> Result<PendingChange, sqlx::Error> {
        let query = format!(
            "UPDATE pending_changes
             SET status = $2, decided_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PendingChange>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(executor)
            .await
    }

    /// Full amendment history for a contract, newest first. Includes
    /// decided and superseded rows.
    pub async fn list_for_contract(
        executor: impl sqlx::PgExecutor<'_>,
        contract_id: DbId,
    ) -> Result<Vec<PendingChange>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pending_changes
             WHERE contract_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, PendingChange>(&query)
            .bind(contract_id)
            .fetch_all(executor)
            .await
    }
}
