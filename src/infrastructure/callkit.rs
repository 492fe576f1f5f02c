//! Call widget context and widget adapters
//!
//! The vendor widget scopes its credential session with a process-wide
//! init/deinit pair; here that is an explicit context object owned by the
//! top-level flow controller, and a session handle scoped to the logged-in
//! user.

use crate::domain::call::{CallCredentials, CallScreenSpec, CallWidget};
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::UserId;
use crate::domain::user::IdentityRecord;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Owns the widget binding and the application credentials
pub struct WidgetContext {
    credentials: CallCredentials,
    widget: Arc<dyn CallWidget>,
}

impl WidgetContext {
    pub fn new(credentials: CallCredentials, widget: Arc<dyn CallWidget>) -> Self {
        Self {
            credentials,
            widget,
        }
    }

    /// Start a credential session for the logged-in user
    pub fn start(&self, local: &IdentityRecord) -> WidgetSession {
        info!(
            user_id = %local.id,
            app_id = self.credentials.app_id(),
            "call widget session started"
        );
        WidgetSession {
            credentials: self.credentials.clone(),
            widget: Arc::clone(&self.widget),
            local_id: local.id.clone(),
            active: true,
        }
    }
}

/// A started credential session, stopped at logout
pub struct WidgetSession {
    credentials: CallCredentials,
    widget: Arc<dyn CallWidget>,
    local_id: UserId,
    active: bool,
}

impl WidgetSession {
    pub fn credentials(&self) -> &CallCredentials {
        &self.credentials
    }

    pub fn widget(&self) -> &dyn CallWidget {
        self.widget.as_ref()
    }

    pub fn local_id(&self) -> &UserId {
        &self.local_id
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Stop the session; tolerates an already-stopped one
    pub fn stop(&mut self) {
        if !self.active {
            warn!(user_id = %self.local_id, "call widget session already stopped");
            return;
        }
        self.active = false;
        info!(user_id = %self.local_id, "call widget session stopped");
    }
}

/// Logs launches where the vendor widget binding would render a call UI
#[derive(Default)]
pub struct LoggingWidget;

impl LoggingWidget {
    pub fn new() -> Self {
        Self
    }
}

impl CallWidget for LoggingWidget {
    fn open(&self, credentials: &CallCredentials, spec: &CallScreenSpec) -> Result<()> {
        info!(
            app_id = credentials.app_id(),
            session_id = %spec.session_id,
            local = %spec.local_id,
            peer = %spec.peer_id,
            mode = spec.mode.as_str(),
            "call widget opened"
        );
        Ok(())
    }
}

/// Records every launch for assertions in tests
#[derive(Default)]
pub struct RecordingWidget {
    launches: Mutex<Vec<CallScreenSpec>>,
}

impl RecordingWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launches(&self) -> Vec<CallScreenSpec> {
        self.launches.lock().unwrap().clone()
    }
}

impl CallWidget for RecordingWidget {
    fn open(&self, _credentials: &CallCredentials, spec: &CallScreenSpec) -> Result<()> {
        self.launches.lock().unwrap().push(spec.clone());
        Ok(())
    }
}
