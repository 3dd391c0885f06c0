//! Pending-change (amendment) status and the contract field patch.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle state of a proposed amendment, stored as snake_case text.
///
/// `Pending` is the only live state; at most one live change exists per
/// contract. A new proposal arriving while one is pending marks the old row
/// `Superseded` -- the discard semantics of the original workflow, kept as a
/// status instead of a hard delete so the audit trail survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    Pending,
    Approved,
    Rejected,
    Superseded,
}

impl ChangeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Superseded => "superseded",
        }
    }
}

impl std::fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ChangeStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "superseded" => Ok(Self::Superseded),
            other => Err(format!("unknown change status '{other}'")),
        }
    }
}

/// A partial update to a contract's mutable lease terms.
///
/// This is the one shape in which contract fields ever change: direct edits
/// of PENDING contracts and the `proposed_fields` payload of an amendment
/// both use it. Fields left `None` are untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupant_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rental_price_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl ContractPatch {
    pub fn is_empty(&self) -> bool {
        self.occupant_count.is_none()
            && self.rental_price_cents.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    /// Field-level validation, independent of the contract it lands on.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.is_empty() {
            return Err(CoreError::Validation(
                "patch must change at least one field".to_string(),
            ));
        }
        if let Some(count) = self.occupant_count {
            if count < 1 {
                return Err(CoreError::Validation(
                    "occupant_count must be at least 1".to_string(),
                ));
            }
        }
        if let Some(price) = self.rental_price_cents {
            if price < 0 {
                return Err(CoreError::Validation(
                    "rental_price_cents must not be negative".to_string(),
                ));
            }
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(CoreError::Validation(
                    "start_date must not be after end_date".to_string(),
                ));
            }
        }
        Ok(())
    }
}
