//! User bounded context - identity records and the directory port

pub mod directory;
pub mod entity;

pub use directory::{DirectorySnapshot, DirectorySubscription, UserDirectory};
pub use entity::IdentityRecord;
