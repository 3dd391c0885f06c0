//! Entity models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//!
//! Status columns are stored as snake_case text and decoded into the
//! `rentora_core` enums via `#[sqlx(try_from = "String")]`.

pub mod building;
pub mod contract;
pub mod notification;
pub mod pending_change;
pub mod room;
pub mod user;
