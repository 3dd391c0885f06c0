//! Building entity model.
//!
//! Buildings have no CRUD surface in this service; the model exists so rooms
//! can be seeded against a valid foreign key.

use serde::Serialize;
use sqlx::FromRow;

use rentora_core::types::{DbId, Timestamp};

/// A row from the `buildings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Building {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}
