//! User (person/account) entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use rentora_core::role::Role;
use rentora_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub display_name: String,
    pub email: String,
    /// Derived for guest/active_renter accounts; operator is assigned.
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for seeding a user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub display_name: String,
    pub email: String,
    pub role: Option<Role>,
}
