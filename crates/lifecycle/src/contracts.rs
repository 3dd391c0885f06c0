//! Contract state machine operations: create, confirm, reject, direct
//! update, delete, expire, plus the derived occupancy view and role sync.

use serde_json::json;

use rentora_core::change::ContractPatch;
use rentora_core::contract::{ContractAction, ContractStatus};
use rentora_core::error::CoreError;
use rentora_core::room::RoomStatus;
use rentora_core::types::DbId;
use rentora_db::models::contract::{Contract, CreateContract};
use rentora_db::models::room::RoomOccupancy;
use rentora_db::models::user::User;
use rentora_db::repositories::{ContractRepo, RoomRepo};
use rentora_events::{LifecycleEvent, Recipient};

use crate::engine::LifecycleEngine;
use crate::error::LifecycleError;

impl LifecycleEngine {
    /// Create a contract in PENDING (default) or directly ACTIVE state.
    ///
    /// The room must exist and not be under maintenance. An ACTIVE target
    /// additionally passes the capacity guard. Side effects: activation
    /// marks the room occupied and promotes the tenant; a PENDING contract
    /// on a vacant room reserves it.
    pub async fn create_contract(
        &self,
        input: &CreateContract,
    ) -> Result<Contract, LifecycleError> {
        let status = input.status.unwrap_or(ContractStatus::Pending);
        if !matches!(status, ContractStatus::Pending | ContractStatus::Active) {
            return Err(CoreError::Validation(format!(
                "a contract can only be created as 'pending' or 'active', not '{status}'"
            ))
            .into());
        }
        if input.occupant_count < 1 {
            return Err(
                CoreError::Validation("occupant_count must be at least 1".to_string()).into(),
            );
        }
        if input.rental_price_cents < 0 {
            return Err(CoreError::Validation(
                "rental_price_cents must not be negative".to_string(),
            )
            .into());
        }
        if input.start_date > input.end_date {
            return Err(CoreError::Validation(
                "start_date must not be after end_date".to_string(),
            )
            .into());
        }

        let mut tx = self.pool.begin().await?;

        let room = Self::lock_room(&mut tx, input.room_id).await?;
        // Tenant must exist; also fail before insert rather than on the FK.
        Self::fetch_user(&mut tx, input.tenant_id).await?;

        if room.status == RoomStatus::Maintenance {
            return Err(CoreError::Validation(format!(
                "room {} is under maintenance",
                room.id
            ))
            .into());
        }
        if status == ContractStatus::Active {
            Self::ensure_capacity(&mut tx, &room, i64::from(input.occupant_count), None).await?;
        }

        let contract = ContractRepo::insert(&mut *tx, input, status).await?;

        match status {
            ContractStatus::Active => {
                Self::mark_room_occupied(&mut tx, &room).await?;
                Self::sync_role_in_tx(&mut tx, contract.tenant_id).await?;
            }
            ContractStatus::Pending if room.status == RoomStatus::Vacant => {
                RoomRepo::set_status(&mut *tx, room.id, RoomStatus::Reserved).await?;
            }
            _ => {}
        }

        tx.commit().await?;

        let event_type = match status {
            ContractStatus::Active => "contract.activated",
            _ => "contract.created",
        };
        self.publish(
            LifecycleEvent::new(
                event_type,
                contract.id,
                contract.room_id,
                Recipient::User(contract.tenant_id),
            )
            .with_payload(json!({ "occupant_count": contract.occupant_count })),
        );

        Ok(contract)
    }

    /// Tenant confirmation of a PENDING contract: the activation transition.
    pub async fn confirm_contract(
        &self,
        contract_id: DbId,
        tenant_id: DbId,
    ) -> Result<Contract, LifecycleError> {
        let mut tx = self.pool.begin().await?;

        let contract = Self::fetch_contract(&mut tx, contract_id).await?;
        let room = Self::lock_room(&mut tx, contract.room_id).await?;
        // Re-read now that the room lock serializes us against concurrent
        // operations on this room.
        let contract = Self::fetch_contract(&mut tx, contract_id).await?;

        contract.status.ensure(ContractAction::Confirm)?;
        if contract.tenant_id != tenant_id {
            return Err(CoreError::Forbidden(
                "only the contract's tenant may confirm it".to_string(),
            )
            .into());
        }
        if room.status == RoomStatus::Maintenance {
            return Err(CoreError::Validation(format!(
                "room {} is under maintenance",
                room.id
            ))
            .into());
        }
        Self::ensure_capacity(&mut tx, &room, i64::from(contract.occupant_count), None).await?;

        let contract = ContractRepo::set_status(&mut *tx, contract_id, ContractStatus::Active).await?;
        Self::mark_room_occupied(&mut tx, &room).await?;
        Self::sync_role_in_tx(&mut tx, contract.tenant_id).await?;

        tx.commit().await?;

        self.publish(
            LifecycleEvent::new(
                "contract.confirmed",
                contract.id,
                contract.room_id,
                Recipient::Operators,
            )
            .with_payload(json!({ "tenant_id": contract.tenant_id })),
        );

        Ok(contract)
    }

    /// Tenant rejection of a PENDING contract. The contract row is deleted
    /// and the room reverts toward vacant if nothing else holds it.
    pub async fn reject_contract(
        &self,
        contract_id: DbId,
        tenant_id: DbId,
    ) -> Result<(), LifecycleError> {
        let mut tx = self.pool.begin().await?;

        let contract = Self::fetch_contract(&mut tx, contract_id).await?;
        let room = Self::lock_room(&mut tx, contract.room_id).await?;
        let contract = Self::fetch_contract(&mut tx, contract_id).await?;

        contract.status.ensure(ContractAction::Reject)?;
        if contract.tenant_id != tenant_id {
            return Err(CoreError::Forbidden(
                "only the contract's tenant may reject it".to_string(),
            )
            .into());
        }

        ContractRepo::delete(&mut *tx, contract_id).await?;
        Self::sync_room_status(&mut tx, &room).await?;
        Self::sync_role_in_tx(&mut tx, contract.tenant_id).await?;

        tx.commit().await?;

        self.publish(
            LifecycleEvent::new(
                "contract.rejected",
                contract.id,
                contract.room_id,
                Recipient::Operators,
            )
            .with_payload(json!({ "tenant_id": contract.tenant_id })),
        );

        Ok(())
    }

    /// Direct field edit of a PENDING contract.
    ///
    /// ACTIVE contracts must go through the amendment workflow instead, and
    /// terminal contracts are frozen; both are refused as invalid
    /// transitions. An occupant_count change re-checks capacity with this
    /// contract excluded from the current sum.
    pub async fn update_contract(
        &self,
        contract_id: DbId,
        patch: &ContractPatch,
    ) -> Result<Contract, LifecycleError> {
        patch.validate().map_err(LifecycleError::Core)?;

        let mut tx = self.pool.begin().await?;

        let contract = Self::fetch_contract(&mut tx, contract_id).await?;
        let room = Self::lock_room(&mut tx, contract.room_id).await?;
        let contract = Self::fetch_contract(&mut tx, contract_id).await?;

        contract.status.ensure(ContractAction::DirectUpdate)?;
        Self::ensure_effective_dates(&contract, patch)?;
        if let Some(count) = patch.occupant_count {
            Self::ensure_capacity(&mut tx, &room, i64::from(count), Some(contract_id)).await?;
        }

        let contract = ContractRepo::apply_patch(&mut *tx, contract_id, patch).await?;

        tx.commit().await?;

        self.publish(
            LifecycleEvent::new(
                "contract.updated",
                contract.id,
                contract.room_id,
                Recipient::User(contract.tenant_id),
            )
            .with_payload(serde_json::to_value(patch).unwrap_or_default()),
        );

        Ok(contract)
    }

    /// Delete a contract that is not in force (PENDING or terminal).
    ///
    /// Deleting a PENDING contract recomputes room status and re-runs the
    /// role demoter for the tenant.
    pub async fn delete_contract(&self, contract_id: DbId) -> Result<(), LifecycleError> {
        let mut tx = self.pool.begin().await?;

        let contract = Self::fetch_contract(&mut tx, contract_id).await?;
        let room = Self::lock_room(&mut tx, contract.room_id).await?;
        let contract = Self::fetch_contract(&mut tx, contract_id).await?;

        contract.status.ensure(ContractAction::Delete)?;

        ContractRepo::delete(&mut *tx, contract_id).await?;
        Self::sync_room_status(&mut tx, &room).await?;
        Self::sync_role_in_tx(&mut tx, contract.tenant_id).await?;

        tx.commit().await?;

        if contract.status == ContractStatus::Pending {
            self.publish(LifecycleEvent::new(
                "contract.deleted",
                contract.id,
                contract.room_id,
                Recipient::User(contract.tenant_id),
            ));
        }

        Ok(())
    }

    /// Terminal transition driven by the external expiry scheduler.
    ///
    /// Same side effects as termination: room status recomputed, tenant
    /// role re-derived.
    pub async fn expire_contract(&self, contract_id: DbId) -> Result<Contract, LifecycleError> {
        let mut tx = self.pool.begin().await?;

        let contract = Self::fetch_contract(&mut tx, contract_id).await?;
        let room = Self::lock_room(&mut tx, contract.room_id).await?;
        let contract = Self::fetch_contract(&mut tx, contract_id).await?;

        contract.status.ensure(ContractAction::Expire)?;

        let contract =
            ContractRepo::set_status(&mut *tx, contract_id, ContractStatus::Expired).await?;
        Self::sync_room_status(&mut tx, &room).await?;
        Self::sync_role_in_tx(&mut tx, contract.tenant_id).await?;

        tx.commit().await?;

        self.publish(
            LifecycleEvent::new(
                "contract.expired",
                contract.id,
                contract.room_id,
                Recipient::User(contract.tenant_id),
            )
            .with_payload(json!({ "end_date": contract.end_date })),
        );

        Ok(contract)
    }

    /// Derived occupancy view for a room: the live in-force sum (a contract
    /// mid-amendment or mid-termination-review still occupies), the
    /// configured capacity, and the primary tenant (earliest-created ACTIVE
    /// contract).
    pub async fn room_occupancy(&self, room_id: DbId) -> Result<RoomOccupancy, LifecycleError> {
        let room = RoomRepo::find_by_id(&self.pool, room_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Room",
                id: room_id,
            })?;
        let current = ContractRepo::in_force_occupants(&self.pool, room_id, None).await?;
        let primary_tenant_id = ContractRepo::primary_tenant(&self.pool, room_id).await?;
        Ok(RoomOccupancy {
            current,
            capacity: room.capacity,
            primary_tenant_id,
        })
    }

    /// Recompute one user's role from their full set of contracts.
    ///
    /// Exposed for operational use; every engine operation already performs
    /// the same sync inside its own transaction. Safe to call redundantly.
    pub async fn sync_role(&self, user_id: DbId) -> Result<User, LifecycleError> {
        let mut tx = self.pool.begin().await?;
        Self::sync_role_in_tx(&mut tx, user_id).await?;
        let user = Self::fetch_user(&mut tx, user_id).await?;
        tx.commit().await?;
        Ok(user)
    }
}
