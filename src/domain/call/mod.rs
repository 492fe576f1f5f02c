//! Call bounded context - launch state machine and the widget port

pub mod value_object;
pub mod widget;

pub use value_object::{CallMode, LaunchRequest, LaunchState, PendingCall};
pub use widget::{AppSign, CallCredentials, CallScreenSpec, CallWidget};
