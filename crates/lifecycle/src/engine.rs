//! Engine struct and the shared guards and synchronizers every operation
//! uses.

use std::sync::Arc;

use sqlx::PgConnection;

use rentora_core::change::ContractPatch;
use rentora_core::error::CoreError;
use rentora_core::room::RoomStatus;
use rentora_core::types::DbId;
use rentora_db::models::contract::Contract;
use rentora_db::models::room::Room;
use rentora_db::models::user::User;
use rentora_db::repositories::{ContractRepo, RoomRepo, UserRepo};
use rentora_db::DbPool;
use rentora_events::{EventBus, LifecycleEvent};

use crate::error::LifecycleError;

/// The one owner of contract, pending-change, room-status, and role
/// mutations.
///
/// Cheap to clone behind `Arc`; handlers share a single instance.
pub struct LifecycleEngine {
    pub(crate) pool: DbPool,
    pub(crate) bus: Arc<EventBus>,
}

impl LifecycleEngine {
    pub fn new(pool: DbPool, bus: Arc<EventBus>) -> Self {
        Self { pool, bus }
    }

    /// Publish a lifecycle event after a committed transition.
    ///
    /// Best-effort by construction: the transaction is already committed and
    /// a dropped event only costs a notification.
    pub(crate) fn publish(&self, event: LifecycleEvent) {
        tracing::debug!(
            event_type = %event.event_type,
            contract_id = event.contract_id,
            "Publishing lifecycle event"
        );
        self.bus.publish(event);
    }

    /// Fetch a contract inside the transaction, or `NotFound`.
    pub(crate) async fn fetch_contract(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Contract, LifecycleError> {
        ContractRepo::find_by_id(&mut *conn, id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "Contract",
                    id,
                }
                .into()
            })
    }

    /// Lock the room row for the rest of the transaction, or `NotFound`.
    ///
    /// This is the writer-serialization boundary: every operation that
    /// reads-then-writes occupancy takes this lock first, and always before
    /// re-reading the contract (room-then-contract order avoids deadlock).
    pub(crate) async fn lock_room(
        conn: &mut PgConnection,
        room_id: DbId,
    ) -> Result<Room, LifecycleError> {
        RoomRepo::find_by_id_for_update(&mut *conn, room_id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "Room",
                    id: room_id,
                }
                .into()
            })
    }

    /// Fetch a user inside the transaction, or `NotFound`.
    pub(crate) async fn fetch_user(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<User, LifecycleError> {
        UserRepo::find_by_id(&mut *conn, id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "User",
                    id,
                }
                .into()
            })
    }

    /// Capacity guard: reject any change that would push the room's in-force
    /// occupancy above its capacity.
    ///
    /// Contracts keep their slots through amendment and termination review,
    /// so the current sum covers every in-force status. That is what makes
    /// the return-to-ACTIVE transitions (decline, or an accept that leaves
    /// occupant_count alone) safe without a re-check: the slots were never
    /// released. `exclude_contract_id` removes one contract from the sum
    /// when re-checking a change to that same contract.
    pub(crate) async fn ensure_capacity(
        conn: &mut PgConnection,
        room: &Room,
        additional: i64,
        exclude_contract_id: Option<DbId>,
    ) -> Result<(), LifecycleError> {
        let current =
            ContractRepo::in_force_occupants(&mut *conn, room.id, exclude_contract_id).await?;
        if current + additional > i64::from(room.capacity) {
            return Err(CoreError::CapacityExceeded {
                current,
                requested: additional,
                capacity: room.capacity,
            }
            .into());
        }
        Ok(())
    }

    /// Room status synchronizer: recompute the coarse status from the
    /// presence of in-force/PENDING contracts on the room.
    ///
    /// A room under maintenance is left untouched. Runs inside the same
    /// transaction as the transition that triggered it; a failure here
    /// aborts the whole operation.
    pub(crate) async fn sync_room_status(
        conn: &mut PgConnection,
        room: &Room,
    ) -> Result<(), LifecycleError> {
        let (has_in_force, has_pending) = ContractRepo::room_presence(&mut *conn, room.id).await?;
        let derived = room.status.derived(has_in_force, has_pending);
        if derived != room.status {
            RoomRepo::set_status(&mut *conn, room.id, derived).await?;
            tracing::debug!(
                room_id = room.id,
                from = %room.status,
                to = %derived,
                "Room status synchronized"
            );
        }
        Ok(())
    }

    /// Mark the room occupied on contract activation, unless it already is.
    pub(crate) async fn mark_room_occupied(
        conn: &mut PgConnection,
        room: &Room,
    ) -> Result<(), LifecycleError> {
        if room.status != RoomStatus::Occupied {
            RoomRepo::set_status(&mut *conn, room.id, RoomStatus::Occupied).await?;
        }
        Ok(())
    }

    /// Role promoter/demoter: recompute the user's role from their full set
    /// of contracts.
    ///
    /// Idempotent, so it is called unconditionally after every transition
    /// that can change a tenant's ACTIVE contract count. Operator accounts
    /// are never touched. Runs inside the caller's transaction.
    pub(crate) async fn sync_role_in_tx(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<(), LifecycleError> {
        let user = Self::fetch_user(conn, user_id).await?;
        let active = ContractRepo::count_active_for_tenant(&mut *conn, user_id).await?;
        if let Some(role) = user.role.desired(active) {
            UserRepo::set_role(&mut *conn, user_id, role).await?;
            tracing::info!(
                user_id,
                from = %user.role,
                to = %role,
                active_contracts = active,
                "Account role synchronized"
            );
        }
        Ok(())
    }

    /// Validate that a patch applied to this contract leaves a coherent date
    /// range.
    pub(crate) fn ensure_effective_dates(
        contract: &Contract,
        patch: &ContractPatch,
    ) -> Result<(), LifecycleError> {
        let start = patch.start_date.unwrap_or(contract.start_date);
        let end = patch.end_date.unwrap_or(contract.end_date);
        if start > end {
            return Err(CoreError::Validation(
                "start_date must not be after end_date".to_string(),
            )
            .into());
        }
        Ok(())
    }
}
