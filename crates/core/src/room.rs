//! Room status and the derivation rule used by the room status synchronizer.

use serde::{Deserialize, Serialize};

/// Coarse room status, stored as snake_case text.
///
/// This is a signal set only by contract-transition side effects, never a
/// cached occupant count. Invariant: `Vacant` only when no contract on the
/// room is in force or PENDING.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Vacant,
    Reserved,
    Occupied,
    /// Set and cleared by the maintenance module; the synchronizer never
    /// overwrites it.
    Maintenance,
}

impl RoomStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vacant => "vacant",
            Self::Reserved => "reserved",
            Self::Occupied => "occupied",
            Self::Maintenance => "maintenance",
        }
    }

    /// Recompute the status from the presence of contracts on the room.
    ///
    /// Any in-force contract wins over any PENDING one; a room under
    /// maintenance keeps that status regardless of contracts.
    pub fn derived(self, has_in_force: bool, has_pending: bool) -> RoomStatus {
        if self == Self::Maintenance {
            return Self::Maintenance;
        }
        if has_in_force {
            Self::Occupied
        } else if has_pending {
            Self::Reserved
        } else {
            Self::Vacant
        }
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for RoomStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "vacant" => Ok(Self::Vacant),
            "reserved" => Ok(Self::Reserved),
            "occupied" => Ok(Self::Occupied),
            "maintenance" => Ok(Self::Maintenance),
            other => Err(format!("unknown room status '{other}'")),
        }
    }
}
