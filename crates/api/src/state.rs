use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: rentora_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The lifecycle engine: sole owner of contract/room/role mutations.
    pub engine: Arc<rentora_lifecycle::LifecycleEngine>,
    /// Event bus carrying post-commit lifecycle events.
    pub event_bus: Arc<rentora_events::EventBus>,
}
