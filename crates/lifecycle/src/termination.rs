//! The two-party termination workflow.
//!
//! Either party to an ACTIVE contract may request termination; only the
//! other party may approve it. Approval is the terminal transition, with
//! the usual room-status and role side effects.

use serde_json::json;

use rentora_core::contract::{ContractAction, ContractStatus};
use rentora_core::error::CoreError;
use rentora_core::role::Role;
use rentora_core::types::DbId;
use rentora_db::models::contract::Contract;
use rentora_db::repositories::ContractRepo;
use rentora_events::{LifecycleEvent, Recipient};

use crate::engine::LifecycleEngine;
use crate::error::LifecycleError;

impl LifecycleEngine {
    /// Open a termination request on an ACTIVE contract.
    ///
    /// The requester must be the contract's tenant or an operator; the
    /// resulting status records which side asked.
    pub async fn request_termination(
        &self,
        contract_id: DbId,
        requester_id: DbId,
    ) -> Result<Contract, LifecycleError> {
        let mut tx = self.pool.begin().await?;

        let contract = Self::fetch_contract(&mut tx, contract_id).await?;
        let _room = Self::lock_room(&mut tx, contract.room_id).await?;
        let contract = Self::fetch_contract(&mut tx, contract_id).await?;

        contract.status.ensure(ContractAction::RequestTermination)?;

        let status = if requester_id == contract.tenant_id {
            ContractStatus::TerminationRequestedByTenant
        } else {
            let requester = Self::fetch_user(&mut tx, requester_id).await?;
            if requester.role != Role::Operator {
                return Err(CoreError::Forbidden(
                    "only the contract's tenant or an operator may request termination"
                        .to_string(),
                )
                .into());
            }
            ContractStatus::TerminationRequestedByLandlord
        };

        let contract =
            ContractRepo::set_termination_requested(&mut *tx, contract_id, status, requester_id)
                .await?;

        tx.commit().await?;

        // The counterparty has to act on the request.
        let recipient = match status {
            ContractStatus::TerminationRequestedByTenant => Recipient::Operators,
            _ => Recipient::User(contract.tenant_id),
        };
        self.publish(
            LifecycleEvent::new(
                "termination.requested",
                contract.id,
                contract.room_id,
                recipient,
            )
            .with_payload(json!({ "requested_by": requester_id })),
        );

        Ok(contract)
    }

    /// Approve an open termination request and terminate the contract.
    ///
    /// Only the party that did *not* request may approve: a tenant-side
    /// request needs an operator, a landlord-side request needs the tenant.
    /// The room reverts to vacant when no occupancy remains.
    pub async fn approve_termination(
        &self,
        contract_id: DbId,
        approver_id: DbId,
    ) -> Result<Contract, LifecycleError> {
        let mut tx = self.pool.begin().await?;

        let contract = Self::fetch_contract(&mut tx, contract_id).await?;
        let room = Self::lock_room(&mut tx, contract.room_id).await?;
        let contract = Self::fetch_contract(&mut tx, contract_id).await?;

        contract.status.ensure(ContractAction::ApproveTermination)?;

        match contract.status {
            ContractStatus::TerminationRequestedByTenant => {
                let approver = Self::fetch_user(&mut tx, approver_id).await?;
                if approver.role != Role::Operator
                    || contract.termination_requested_by == Some(approver_id)
                {
                    return Err(CoreError::Forbidden(
                        "a tenant-requested termination must be approved by an operator"
                            .to_string(),
                    )
                    .into());
                }
            }
            ContractStatus::TerminationRequestedByLandlord => {
                if approver_id != contract.tenant_id {
                    return Err(CoreError::Forbidden(
                        "a landlord-requested termination must be approved by the tenant"
                            .to_string(),
                    )
                    .into());
                }
            }
            // Ruled out by the transition check above.
            other => {
                return Err(CoreError::Internal(format!(
                    "contract {contract_id} reached termination approval in status '{other}'"
                ))
                .into());
            }
        }

        let requested_by = contract.termination_requested_by;
        let contract =
            ContractRepo::set_status(&mut *tx, contract_id, ContractStatus::Terminated).await?;
        Self::sync_room_status(&mut tx, &room).await?;
        Self::sync_role_in_tx(&mut tx, contract.tenant_id).await?;

        tx.commit().await?;

        let recipient = requested_by
            .map(Recipient::User)
            .unwrap_or(Recipient::Operators);
        self.publish(
            LifecycleEvent::new(
                "termination.approved",
                contract.id,
                contract.room_id,
                recipient,
            )
            .with_payload(json!({ "approved_by": approver_id })),
        );

        Ok(contract)
    }
}
