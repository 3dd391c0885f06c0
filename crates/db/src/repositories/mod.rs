//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Methods
//! invoked inside lifecycle transactions take `impl PgExecutor<'_>` so they
//! accept either `&PgPool` or `&mut *tx`.

pub mod building_repo;
pub mod contract_repo;
pub mod notification_repo;
pub mod pending_change_repo;
pub mod room_repo;
pub mod user_repo;

pub use building_repo::BuildingRepo;
pub use contract_repo::ContractRepo;
pub use notification_repo::NotificationRepo;
pub use pending_change_repo::PendingChangeRepo;
pub use room_repo::RoomRepo;
pub use user_repo::UserRepo;
