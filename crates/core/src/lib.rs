//! Pure domain layer for the Rentora lease lifecycle engine.
//!
//! Everything in this crate is database-free: id/timestamp aliases, the
//! shared [`error::CoreError`] taxonomy, the contract / room / pending-change
//! state machines expressed as tagged enums with explicit transition tables,
//! and the account-role derivation rules. The `rentora-db` and
//! `rentora-lifecycle` crates build on these types.

pub mod change;
pub mod contract;
pub mod error;
pub mod role;
pub mod room;
pub mod types;
