//! Infrastructure layer - adapters for the external collaborators
//!
//! This layer contains:
//! - Store adapters (in-memory and remote WebSocket)
//! - The call widget context and widget adapters
//! - The simulated OS permission subsystem

pub mod callkit;
pub mod permissions;
pub mod store;
