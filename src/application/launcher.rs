//! Permission-gated call launcher
//!
//! `Idle → CheckingPermissions → {Granted, AwaitingUserPrompt} →
//! {Launching, Denied}`, with the last two re-arming to `Idle` so one
//! launcher serves successive attempts from the same screen.

use crate::domain::call::{LaunchRequest, LaunchState, PendingCall};
use crate::domain::permission::{Capability, DevicePermissions};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::user::IdentityRecord;
use crate::interface::metrics;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of one launch attempt
#[derive(Debug, Clone)]
pub enum LaunchDecision {
    /// Permissions in hand; navigation payload for the call screen
    Launched(LaunchRequest),
    /// Prompt denied for the listed capabilities; flow stops here
    Denied(Vec<Capability>),
    /// The owning screen was torn down while the prompt was outstanding;
    /// the decision is discarded
    Abandoned,
}

pub struct CallLauncher {
    local: IdentityRecord,
    permissions: Arc<dyn DevicePermissions>,
    state: LaunchState,
    pending: Option<PendingCall>,
}

impl CallLauncher {
    pub fn new(local: IdentityRecord, permissions: Arc<dyn DevicePermissions>) -> Self {
        Self {
            local,
            permissions,
            state: LaunchState::Idle,
            pending: None,
        }
    }

    pub fn state(&self) -> LaunchState {
        self.state
    }

    /// Run one launch attempt to its terminal outcome
    ///
    /// Camera and microphone are checked for every mode. If either is
    /// unauthorized, one batched prompt covers both; the pending call is
    /// taken unconditionally when the prompt resolves, granted or denied.
    pub async fn launch(&mut self, call: PendingCall) -> Result<LaunchDecision> {
        self.transition_to(LaunchState::CheckingPermissions)?;

        let required = Capability::REQUIRED_FOR_CALLS;
        let unauthorized: Vec<Capability> = required
            .iter()
            .copied()
            .filter(|c| !self.permissions.is_authorized(*c))
            .collect();

        if unauthorized.is_empty() {
            self.transition_to(LaunchState::Granted)?;
            return self.proceed(call);
        }

        self.pending = Some(call);
        self.transition_to(LaunchState::AwaitingUserPrompt)?;
        debug!(missing = ?unauthorized, "issuing batched device authorization prompt");
        metrics::record_permission_prompt();

        let verdict = self.permissions.request(&required).await;

        // Pending state is cleared whether the prompt was granted or denied,
        // so a stale triple can never replay into a later attempt.
        let call = self.pending.take().ok_or_else(|| {
            DomainError::InvalidStateTransition(
                "prompt resolved with no pending call".to_string(),
            )
        })?;

        if verdict.all_granted(&required) {
            return self.proceed(call);
        }

        let denied = verdict.denied();
        self.transition_to(LaunchState::Denied)?;
        self.transition_to(LaunchState::Idle)?;
        warn!(denied = ?denied, "call abandoned: device authorization denied");
        metrics::record_call_launch("denied");
        Ok(LaunchDecision::Denied(denied))
    }

    fn proceed(&mut self, call: PendingCall) -> Result<LaunchDecision> {
        self.transition_to(LaunchState::Launching)?;
        let request = LaunchRequest::new(&self.local, &call);
        info!(
            target = %call.target_id,
            mode = call.mode.as_str(),
            "launching call"
        );
        metrics::record_call_launch("launched");
        self.transition_to(LaunchState::Idle)?;
        Ok(LaunchDecision::Launched(request))
    }

    fn transition_to(&mut self, new_state: LaunchState) -> Result<()> {
        if !self.state.can_transition_to(new_state) {
            return Err(DomainError::InvalidStateTransition(format!(
                "{:?} -> {:?}",
                self.state, new_state
            )));
        }
        self.state = new_state;
        Ok(())
    }
}
