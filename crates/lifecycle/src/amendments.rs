//! The amendment (pending-change) workflow.
//!
//! An operator proposes a diff to an ACTIVE contract; the tenant accepts or
//! declines before it takes effect. At most one live proposal exists per
//! contract: a new proposal supersedes the previous one rather than merging
//! with it.

use serde_json::json;

use rentora_core::change::{ChangeStatus, ContractPatch};
use rentora_core::contract::{ContractAction, ContractStatus};
use rentora_core::error::CoreError;
use rentora_core::role::Role;
use rentora_core::types::DbId;
use rentora_db::models::contract::Contract;
use rentora_db::models::pending_change::PendingChange;
use rentora_db::repositories::{ContractRepo, PendingChangeRepo};
use rentora_events::{LifecycleEvent, Recipient};

use crate::engine::LifecycleEngine;
use crate::error::LifecycleError;

impl LifecycleEngine {
    /// Propose an amendment to an ACTIVE contract.
    ///
    /// Only operators may propose. Any live proposal for the contract is
    /// marked superseded -- discarded without taking effect, kept for the
    /// audit trail. The contract moves to PENDING_UPDATE until the tenant
    /// decides.
    pub async fn propose_amendment(
        &self,
        contract_id: DbId,
        patch: &ContractPatch,
        proposer_id: DbId,
        reason: &str,
    ) -> Result<PendingChange, LifecycleError> {
        patch.validate().map_err(LifecycleError::Core)?;

        let mut tx = self.pool.begin().await?;

        let contract = Self::fetch_contract(&mut tx, contract_id).await?;
        let _room = Self::lock_room(&mut tx, contract.room_id).await?;
        let contract = Self::fetch_contract(&mut tx, contract_id).await?;

        contract.status.ensure(ContractAction::ProposeAmendment)?;
        let proposer = Self::fetch_user(&mut tx, proposer_id).await?;
        if proposer.role != Role::Operator {
            return Err(CoreError::Forbidden(
                "only an operator may propose an amendment".to_string(),
            )
            .into());
        }

        let superseded = PendingChangeRepo::supersede_pending(&mut *tx, contract_id).await?;
        if superseded > 0 {
            tracing::info!(
                contract_id,
                "Existing pending change superseded by new proposal"
            );
        }
        let change =
            PendingChangeRepo::insert(&mut *tx, contract_id, patch, proposer_id, reason).await?;
        ContractRepo::set_status(&mut *tx, contract_id, ContractStatus::PendingUpdate).await?;

        tx.commit().await?;

        self.publish(
            LifecycleEvent::new(
                "amendment.proposed",
                contract.id,
                contract.room_id,
                Recipient::User(contract.tenant_id),
            )
            .with_payload(json!({
                "reason": reason,
                "proposed_fields": change.proposed_fields,
            })),
        );

        Ok(change)
    }

    /// Tenant acceptance: apply every proposed field and return the contract
    /// to ACTIVE.
    ///
    /// Capacity is re-checked when the proposal changes occupant_count; a
    /// proposal that no longer fits fails here and the contract stays in
    /// PENDING_UPDATE with the proposal still live.
    pub async fn accept_amendment(
        &self,
        contract_id: DbId,
        tenant_id: DbId,
    ) -> Result<Contract, LifecycleError> {
        let mut tx = self.pool.begin().await?;

        let contract = Self::fetch_contract(&mut tx, contract_id).await?;
        let room = Self::lock_room(&mut tx, contract.room_id).await?;
        let contract = Self::fetch_contract(&mut tx, contract_id).await?;

        contract.status.ensure(ContractAction::AcceptAmendment)?;
        if contract.tenant_id != tenant_id {
            return Err(CoreError::Forbidden(
                "only the contract's tenant may accept an amendment".to_string(),
            )
            .into());
        }

        let change = Self::live_change(&mut tx, contract_id).await?;
        let patch: ContractPatch =
            serde_json::from_value(change.proposed_fields.clone()).map_err(|e| {
                CoreError::Internal(format!(
                    "pending change {} carries an unreadable patch: {e}"
                , change.id))
            })?;

        Self::ensure_effective_dates(&contract, &patch)?;
        if let Some(count) = patch.occupant_count {
            // The contract's current slots are in the in-force sum; swap
            // them for the proposed count.
            Self::ensure_capacity(&mut tx, &room, i64::from(count), Some(contract_id)).await?;
        }

        ContractRepo::apply_patch(&mut *tx, contract_id, &patch).await?;
        PendingChangeRepo::decide(&mut *tx, change.id, ChangeStatus::Approved).await?;
        let contract =
            ContractRepo::set_status(&mut *tx, contract_id, ContractStatus::Active).await?;
        Self::sync_room_status(&mut tx, &room).await?;
        Self::sync_role_in_tx(&mut tx, contract.tenant_id).await?;

        tx.commit().await?;

        self.publish(
            LifecycleEvent::new(
                "amendment.accepted",
                contract.id,
                contract.room_id,
                Recipient::User(change.proposer_id),
            )
            .with_payload(json!({ "change_id": change.id })),
        );

        Ok(contract)
    }

    /// Tenant refusal: the proposal is marked rejected and the contract
    /// returns to ACTIVE with its fields untouched.
    pub async fn decline_amendment(
        &self,
        contract_id: DbId,
        tenant_id: DbId,
    ) -> Result<Contract, LifecycleError> {
        let mut tx = self.pool.begin().await?;

        let contract = Self::fetch_contract(&mut tx, contract_id).await?;
        let room = Self::lock_room(&mut tx, contract.room_id).await?;
        let contract = Self::fetch_contract(&mut tx, contract_id).await?;

        contract.status.ensure(ContractAction::DeclineAmendment)?;
        if contract.tenant_id != tenant_id {
            return Err(CoreError::Forbidden(
                "only the contract's tenant may decline an amendment".to_string(),
            )
            .into());
        }

        let change = Self::live_change(&mut tx, contract_id).await?;
        PendingChangeRepo::decide(&mut *tx, change.id, ChangeStatus::Rejected).await?;
        let contract =
            ContractRepo::set_status(&mut *tx, contract_id, ContractStatus::Active).await?;
        Self::sync_room_status(&mut tx, &room).await?;
        Self::sync_role_in_tx(&mut tx, contract.tenant_id).await?;

        tx.commit().await?;

        self.publish(
            LifecycleEvent::new(
                "amendment.declined",
                contract.id,
                contract.room_id,
                Recipient::User(change.proposer_id),
            )
            .with_payload(json!({ "change_id": change.id })),
        );

        Ok(contract)
    }

    /// The single live change a PENDING_UPDATE contract must carry.
    ///
    /// Its absence means the invariant was broken outside the engine, which
    /// is an internal error rather than a caller mistake.
    async fn live_change(
        conn: &mut sqlx::PgConnection,
        contract_id: DbId,
    ) -> Result<PendingChange, LifecycleError> {
        PendingChangeRepo::find_pending_for_contract(&mut *conn, contract_id)
            .await?
            .ok_or_else(|| {
                CoreError::Internal(format!(
                    "contract {contract_id} is in pending_update without a live pending change"
                ))
                .into()
            })
    }
}
