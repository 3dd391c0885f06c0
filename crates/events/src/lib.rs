//! Rentora event bus and notification infrastructure.
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`LifecycleEvent`] — the canonical envelope published by the lifecycle
//!   engine after each transition a counterparty needs to act on.
//! - [`NotificationWriter`] — background service that turns events into
//!   in-app notification rows, best-effort.

pub mod bus;
pub mod notify;

pub use bus::{EventBus, LifecycleEvent, Recipient};
pub use notify::NotificationWriter;
