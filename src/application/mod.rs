//! Application layer - screen-level use cases
//!
//! One module per screen of the original journey: registration (login),
//! roster (main), call screen, plus the permission-gated launcher the
//! roster screen drives.

pub mod call_screen;
pub mod launcher;
pub mod registration;
pub mod roster;
