//! Call value objects

use crate::domain::shared::value_objects::UserId;
use crate::domain::user::IdentityRecord;
use serde::{Deserialize, Serialize};

/// Call mode, fixed for the duration of a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallMode {
    /// One-to-one voice call
    Voice,
    /// One-to-one voice + video call
    Video,
}

impl CallMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallMode::Voice => "voice",
            CallMode::Video => "video",
        }
    }
}

/// Launcher state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    /// No pending call
    Idle,
    /// Querying current authorization for camera and microphone
    CheckingPermissions,
    /// Both capabilities already authorized
    Granted,
    /// Batched OS prompt issued, awaiting its single resolution
    AwaitingUserPrompt,
    /// Handing off to the call screen
    Launching,
    /// Prompt denied; a normal outcome, not an error
    Denied,
}

impl LaunchState {
    /// Check if state transition is valid
    ///
    /// `Launching` and `Denied` return to `Idle` so one launcher serves
    /// successive attempts.
    pub fn can_transition_to(&self, new_state: LaunchState) -> bool {
        use LaunchState::*;

        matches!(
            (self, new_state),
            (Idle, CheckingPermissions)
                | (CheckingPermissions, Granted)
                | (CheckingPermissions, AwaitingUserPrompt)
                | (Granted, Launching)
                | (AwaitingUserPrompt, Launching)
                | (AwaitingUserPrompt, Denied)
                | (Launching, Idle)
                | (Denied, Idle)
        )
    }
}

/// The provisionally selected call peer, held while a mode choice and/or
/// permission resolution is outstanding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCall {
    pub target_id: UserId,
    pub target_name: String,
    pub mode: CallMode,
}

/// Navigation payload handed to the call screen
///
/// Crosses the screen boundary as plain strings and is re-validated on the
/// other side, like the extras bundle it models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub local_id: String,
    pub local_name: String,
    pub target_id: String,
    pub target_name: String,
    pub mode: CallMode,
}

impl LaunchRequest {
    pub fn new(local: &IdentityRecord, call: &PendingCall) -> Self {
        Self {
            local_id: local.id.to_string(),
            local_name: local.id.to_string(),
            target_id: call.target_id.to_string(),
            target_name: call.target_name.clone(),
            mode: call.mode,
        }
    }
}
