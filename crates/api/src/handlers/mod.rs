pub mod contract;
pub mod notification;
pub mod room;
