//! Repository for the `contracts` table.
//!
//! Status-changing writes live here as plain row operations; the legality
//! checks and side effects around them belong to `rentora-lifecycle`.

use rentora_core::change::ContractPatch;
use rentora_core::contract::ContractStatus;
use rentora_core::types::DbId;

use crate::models::contract::{Contract, ContractFilter, CreateContract};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, room_id, tenant_id, occupant_count, rental_price_cents, \
    start_date, end_date, status, termination_requested_by, created_at, updated_at";

/// SQL literal for the statuses where a contract holds its occupancy slots;
/// mirrors [`ContractStatus::is_in_force`].
const IN_FORCE_STATUSES: &str = "'active', 'pending_update', \
    'termination_requested_by_tenant', 'termination_requested_by_landlord'";

pub struct ContractRepo;

impl ContractRepo {
    /// Insert a new contract with the given status, returning the created row.
    pub async fn insert(
        executor: impl sqlx::PgExecutor<'_>,
        input: &CreateContract,
        status: ContractStatus,
    ) -> Result<Contract, sqlx::Error> {
        let query = format!(
            "INSERT INTO contracts
                (room_id, tenant_id, occupant_count, rental_price_cents, start_date, end_date, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(input.room_id)
            .bind(input.tenant_id)
            .bind(input.occupant_count)
            .bind(input.rental_price_cents)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(status.as_str())
            .fetch_one(executor)
            .await
    }

    /// Find a contract by its ID.
    pub async fn find_by_id(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contracts WHERE id = $1");
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List contracts, optionally filtered by room and/or tenant, newest
    /// first.
    pub async fn list(
        executor: impl sqlx::PgExecutor<'_>,
        filter: &ContractFilter,
    ) -> Result<Vec<Contract>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contracts
             WHERE ($1::BIGINT IS NULL OR room_id = $1)
               AND ($2::BIGINT IS NULL OR tenant_id = $2)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(filter.room_id)
            .bind(filter.tenant_id)
            .fetch_all(executor)
            .await
    }

    /// Occupancy aggregator: SUM of `occupant_count` over in-force contracts
    /// on the room, optionally excluding one contract.
    ///
    /// A contract parked in amendment or termination review keeps its slots,
    /// so the sum covers every in-force status rather than ACTIVE alone. The
    /// exclusion is used when re-checking capacity for a change to that same
    /// contract. Pure read; the result is never cached.
    pub async fn in_force_occupants(
        executor: impl sqlx::PgExecutor<'_>,
        room_id: DbId,
        exclude_contract_id: Option<DbId>,
    ) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COALESCE(SUM(occupant_count), 0)
             FROM contracts
             WHERE room_id = $1
               AND status IN ({IN_FORCE_STATUSES})
               AND ($2::BIGINT IS NULL OR id <> $2)"
        );
        let row: (i64,) = sqlx::query_as(&query)
            .bind(room_id)
            .bind(exclude_contract_id)
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }

    /// Whether the room has any in-force and any PENDING contracts, used by
    /// the room status synchronizer.
    pub async fn room_presence(
        executor: impl sqlx::PgExecutor<'_>,
        room_id: DbId,
    ) -> Result<(bool, bool), sqlx::Error> {
        let query = format!(
            "SELECT
                EXISTS(SELECT 1 FROM contracts
                       WHERE room_id = $1 AND status IN ({IN_FORCE_STATUSES})),
                EXISTS(SELECT 1 FROM contracts WHERE room_id = $1 AND status = 'pending')"
        );
        sqlx::query_as::<_, (bool, bool)>(&query)
            .bind(room_id)
            .fetch_one(executor)
            .await
    }

    /// Count a tenant's ACTIVE contracts across the whole system (role
    /// derivation input).
    pub async fn count_active_for_tenant(
        executor: impl sqlx::PgExecutor<'_>,
        tenant_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM contracts WHERE tenant_id = $1 AND status = 'active'",
        )
        .bind(tenant_id)
        .fetch_one(executor)
        .await?;
        Ok(row.0)
    }

    /// Tenant on the earliest-created ACTIVE contract for the room, if any.
    pub async fn primary_tenant(
        executor: impl sqlx::PgExecutor<'_>,
        room_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "SELECT tenant_id FROM contracts
             WHERE room_id = $1 AND status = 'active'
             ORDER BY created_at ASC, id ASC
             LIMIT 1",
        )
        .bind(room_id)
        .fetch_optional(executor)
        .await?;
        Ok(row.map(|r| r.0))
    }

    /// Set a contract's status, clearing any open termination request.
    pub async fn set_status(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        status: ContractStatus,
    ) -> Result<Contract, sqlx::Error> {
        let query = format!(
            "UPDATE contracts
             SET status = $2, termination_requested_by = NULL, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(executor)
            .await
    }

    /// Open a termination request: set one of the two requested statuses and
    /// record the requester.
    pub async fn set_termination_requested(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        status: ContractStatus,
        requester_id: DbId,
    ) -> Result<Contract, sqlx::Error> {
        let query = format!(
            "UPDATE contracts
             SET status = $2, termination_requested_by = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(requester_id)
            .fetch_one(executor)
            .await
    }

    /// Apply a field patch. Only non-`None` fields change; status is not
    /// touched here.
    pub async fn apply_patch(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        patch: &ContractPatch,
    ) -> Result<Contract, sqlx::Error> {
        let query = format!(
            "UPDATE contracts SET
                occupant_count = COALESCE($2, occupant_count),
                rental_price_cents = COALESCE($3, rental_price_cents),
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .bind(patch.occupant_count)
            .bind(patch.rental_price_cents)
            .bind(patch.start_date)
            .bind(patch.end_date)
            .fetch_one(executor)
            .await
    }

    /// Permanently delete a contract. Returns `true` if a row was removed.
    pub async fn delete(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
