//! Contract status state machine.
//!
//! [`ContractStatus`] is the authoritative lifecycle state of a lease
//! contract. Every mutation goes through the lifecycle engine, which checks
//! legality with [`ContractStatus::ensure`] against the transition table in
//! [`ContractStatus::allows`] -- there are no scattered status conditionals
//! elsewhere in the codebase.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle state of a lease contract, stored as snake_case text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    /// Created by an operator, awaiting the tenant's confirmation.
    Pending,
    /// In force; counts towards room occupancy and tenant role.
    Active,
    /// Active contract with a live amendment awaiting the tenant's decision.
    PendingUpdate,
    /// Tenant asked to terminate; an operator must approve.
    TerminationRequestedByTenant,
    /// Operator asked to terminate; the tenant must approve.
    TerminationRequestedByLandlord,
    /// Terminated by mutual approval. Terminal.
    Terminated,
    /// Ran past its end date; set by an external scheduled job. Terminal.
    Expired,
}

/// An operation attempted against a contract, used to index the
/// transition table and to label `InvalidTransition` errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractAction {
    Confirm,
    Reject,
    DirectUpdate,
    Delete,
    ProposeAmendment,
    AcceptAmendment,
    DeclineAmendment,
    RequestTermination,
    ApproveTermination,
    Expire,
}

impl ContractStatus {
    /// Database / JSON representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::PendingUpdate => "pending_update",
            Self::TerminationRequestedByTenant => "termination_requested_by_tenant",
            Self::TerminationRequestedByLandlord => "termination_requested_by_landlord",
            Self::Terminated => "terminated",
            Self::Expired => "expired",
        }
    }

    /// A terminal contract never re-enters the lifecycle.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Terminated | Self::Expired)
    }

    /// An in-force contract holds its occupancy slots.
    ///
    /// Covers ACTIVE and the three review states an ACTIVE contract passes
    /// through (amendment pending, termination requested either way). These
    /// all return to ACTIVE or end terminally, so their occupants stay
    /// counted against room capacity the whole time.
    pub fn is_in_force(self) -> bool {
        matches!(
            self,
            Self::Active
                | Self::PendingUpdate
                | Self::TerminationRequestedByTenant
                | Self::TerminationRequestedByLandlord
        )
    }

    /// Either of the two one-sided termination-request states.
    pub fn is_termination_requested(self) -> bool {
        matches!(
            self,
            Self::TerminationRequestedByTenant | Self::TerminationRequestedByLandlord
        )
    }

    /// The transition table: which actions are legal from this status.
    pub fn allows(self, action: ContractAction) -> bool {
        use ContractAction::*;
        match action {
            Confirm | Reject | DirectUpdate => self == Self::Pending,
            // Deletion is blocked while the contract is in force or has a
            // live two-party workflow attached.
            Delete => matches!(self, Self::Pending | Self::Terminated | Self::Expired),
            ProposeAmendment | RequestTermination | Expire => self == Self::Active,
            AcceptAmendment | DeclineAmendment => self == Self::PendingUpdate,
            ApproveTermination => self.is_termination_requested(),
        }
    }

    /// Check the transition table, producing the typed error on refusal.
    pub fn ensure(self, action: ContractAction) -> Result<(), CoreError> {
        if self.allows(action) {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                from: self.as_str(),
                action: action.as_str(),
            })
        }
    }
}

impl ContractAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Reject => "reject",
            Self::DirectUpdate => "update",
            Self::Delete => "delete",
            Self::ProposeAmendment => "propose an amendment to",
            Self::AcceptAmendment => "accept an amendment to",
            Self::DeclineAmendment => "decline an amendment to",
            Self::RequestTermination => "request termination of",
            Self::ApproveTermination => "approve termination of",
            Self::Expire => "expire",
        }
    }
}

impl std::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ContractStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "pending_update" => Ok(Self::PendingUpdate),
            "termination_requested_by_tenant" => Ok(Self::TerminationRequestedByTenant),
            "termination_requested_by_landlord" => Ok(Self::TerminationRequestedByLandlord),
            "terminated" => Ok(Self::Terminated),
            "expired" => Ok(Self::Expired),
            other => Err(format!("unknown contract status '{other}'")),
        }
    }
}
