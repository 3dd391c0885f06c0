//! Account roles and the promotion/demotion rule.
//!
//! `ActiveRenter` is a derived quantity: a user holds it iff they hold at
//! least one ACTIVE contract anywhere in the system. The rule is recomputed
//! from the contracts after every relevant transition rather than tracked
//! with an incremental counter, which makes redundant sync calls harmless.

use serde::{Deserialize, Serialize};

/// Account role, stored as snake_case text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Guest,
    ActiveRenter,
    /// Staff account. Never auto-promoted or auto-demoted.
    Operator,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::ActiveRenter => "active_renter",
            Self::Operator => "operator",
        }
    }

    /// The role this account should hold given its number of ACTIVE
    /// contracts, or `None` when no change is needed.
    ///
    /// Idempotent: applying the returned role and calling again always
    /// yields `None`.
    pub fn desired(self, active_contracts: i64) -> Option<Role> {
        match self {
            Self::Operator => None,
            Self::Guest if active_contracts >= 1 => Some(Self::ActiveRenter),
            Self::ActiveRenter if active_contracts == 0 => Some(Self::Guest),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "guest" => Ok(Self::Guest),
            "active_renter" => Ok(Self::ActiveRenter),
            "operator" => Ok(Self::Operator),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_with_active_contract_is_promoted() {
        assert_eq!(Role::Guest.desired(1), Some(Role::ActiveRenter));
        assert_eq!(Role::Guest.desired(3), Some(Role::ActiveRenter));
    }

    #[test]
    fn test_renter_with_no_contracts_is_demoted() {
        assert_eq!(Role::ActiveRenter.desired(0), Some(Role::Guest));
    }

    #[test]
    fn test_no_change_when_already_correct() {
        assert_eq!(Role::Guest.desired(0), None);
        assert_eq!(Role::ActiveRenter.desired(1), None);
        assert_eq!(Role::ActiveRenter.desired(5), None);
    }

    #[test]
    fn test_operator_is_never_touched() {
        assert_eq!(Role::Operator.desired(0), None);
        assert_eq!(Role::Operator.desired(10), None);
    }

    #[test]
    fn test_sync_is_idempotent() {
        // Applying the desired role and re-deriving must be a no-op.
        for role in [Role::Guest, Role::ActiveRenter] {
            for count in [0, 1, 4] {
                let next = role.desired(count).unwrap_or(role);
                assert_eq!(next.desired(count), None);
            }
        }
    }
}
