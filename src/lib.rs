//! Parley - client-side core of a one-to-one voice/video calling app
//!
//! Register an identity, watch a live roster of other registered users, and
//! launch a permission-gated call through an external prebuilt call widget.
//! Presence storage, signaling, and media live behind ports; this crate is
//! the glue between them.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interface;

// Re-export commonly used types
pub use domain::shared::error::DomainError;
pub use domain::shared::result::Result;
