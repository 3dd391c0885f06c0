use crate::types::DbId;

/// Domain error taxonomy shared by every layer.
///
/// All variants are recoverable and reportable to the caller; none is fatal
/// to the process. The HTTP layer maps each variant to a status code in
/// `rentora_api::error`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// The requested operation is not legal from the contract's current
    /// state (e.g. amending a PENDING contract, approving a termination
    /// that was never requested).
    #[error("Invalid transition: cannot {action} a contract in status '{from}'")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },

    /// The actor lacks standing: not the contract's tenant, or not the
    /// correct counterparty for an approval.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Activating or growing a contract would push the room over capacity.
    #[error("Room capacity exceeded: {current} current + {requested} requested > capacity {capacity}")]
    CapacityExceeded {
        current: i64,
        requested: i64,
        capacity: i32,
    },

    /// A concurrent modification was detected (lock conflict or
    /// serialization failure). Callers may retry.
    #[error("Conflicting change: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
