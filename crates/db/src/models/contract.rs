//! Contract entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use rentora_core::contract::ContractStatus;
use rentora_core::types::{DbId, Timestamp};

/// A row from the `contracts` table.
///
/// Owned exclusively by the lifecycle engine: nothing outside it mutates a
/// contract by direct field assignment.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contract {
    pub id: DbId,
    pub room_id: DbId,
    pub tenant_id: DbId,
    /// Number of people this contract covers (co-tenancy support).
    pub occupant_count: i32,
    pub rental_price_cents: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub status: ContractStatus,
    /// Who asked for termination, while a request is open.
    pub termination_requested_by: Option<DbId>,
    /// Seniority: the earliest-created ACTIVE contract on a room is the
    /// primary contract.
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /contracts`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContract {
    pub room_id: DbId,
    pub tenant_id: DbId,
    pub occupant_count: i32,
    pub rental_price_cents: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Target status; `pending` when omitted. Only `pending` and `active`
    /// are accepted.
    pub status: Option<ContractStatus>,
}

/// Filter for `GET /contracts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractFilter {
    pub room_id: Option<DbId>,
    pub tenant_id: Option<DbId>,
}
