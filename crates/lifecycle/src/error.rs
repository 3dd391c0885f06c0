use rentora_core::error::CoreError;

/// Error type for lifecycle engine operations.
///
/// Wraps the domain taxonomy plus raw database errors. Lock conflicts and
/// serialization failures are translated into [`CoreError::Conflict`] so
/// callers see one "concurrent modification" error regardless of which
/// Postgres code produced it.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(sqlx::Error),
}

impl From<sqlx::Error> for LifecycleError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // 40001 serialization_failure, 40P01 deadlock_detected,
            // 55P03 lock_not_available
            if matches!(db_err.code().as_deref(), Some("40001" | "40P01" | "55P03")) {
                return Self::Core(CoreError::Conflict(
                    "concurrent modification detected, retry the operation".to_string(),
                ));
            }
        }
        Self::Db(err)
    }
}
