//! The contract/room lifecycle consistency engine.
//!
//! [`LifecycleEngine`] owns every mutation of contracts, pending changes,
//! room status, and derived account roles. Each public operation runs in a
//! single database transaction with the affected room's row locked
//! `FOR UPDATE`, so concurrent operations on the same room serialize and the
//! capacity invariant (`sum of ACTIVE occupant_counts <= room.capacity`)
//! holds under contention. Contracts on different rooms never contend.
//!
//! Operations are grouped by module:
//! - [`contracts`]: create / confirm / reject / update / delete / expire,
//!   plus the derived occupancy view and role sync
//! - [`amendments`]: the two-party pending-change workflow
//! - [`termination`]: the two-party termination workflow

mod amendments;
mod contracts;
mod engine;
mod error;
mod termination;

pub use engine::LifecycleEngine;
pub use error::LifecycleError;
