//! Interface layer - the outermost application surface
//!
//! This layer handles:
//! - The top-level navigation flow (login, roster, call placement, logout)
//! - Metrics helpers

pub mod flow;
pub mod metrics;
