//! Domain layer - Core business logic and rules
//!
//! This layer contains:
//! - Entities: Objects with identity
//! - Value Objects: Immutable objects without identity
//! - Ports: Interfaces to the external collaborators (store, widget, OS)

pub mod call;
pub mod permission;
pub mod roster;
pub mod shared;
pub mod user;
