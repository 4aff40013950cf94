pub mod booking;
pub mod nearby;
pub mod slot;
pub mod transaction;
pub mod user;
