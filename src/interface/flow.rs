//! Top-level navigation flow
//!
//! Owns the directory, the permission subsystem, the widget context, and
//! the logged-in session, and exposes the user journey as operations:
//! login, target selection, call placement, logout.

use crate::application::call_screen;
use crate::application::launcher::LaunchDecision;
use crate::application::registration::RegistrationService;
use crate::application::roster::RosterScreen;
use crate::domain::call::CallMode;
use crate::domain::permission::{Capability, DevicePermissions};
use crate::domain::roster::Roster;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{CallSessionId, UserId};
use crate::domain::user::{IdentityRecord, UserDirectory};
use crate::infrastructure::callkit::{WidgetContext, WidgetSession};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// What came of a placed call
#[derive(Debug, Clone)]
pub enum CallOutcome {
    /// The widget took over under this session id
    Connected(CallSessionId),
    /// The user denied the listed capabilities; the flow stops here
    PermissionsDenied(Vec<Capability>),
    /// The roster screen was torn down mid-prompt; nothing happened
    Abandoned,
}

pub struct AppFlow {
    directory: Arc<dyn UserDirectory>,
    permissions: Arc<dyn DevicePermissions>,
    widget_context: WidgetContext,
    registration: RegistrationService,
    local: Option<IdentityRecord>,
    session: Option<WidgetSession>,
    roster: Option<RosterScreen>,
}

impl AppFlow {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        permissions: Arc<dyn DevicePermissions>,
        widget_context: WidgetContext,
    ) -> Self {
        let registration = RegistrationService::new(Arc::clone(&directory));
        Self {
            directory,
            permissions,
            widget_context,
            registration,
            local: None,
            session: None,
            roster: None,
        }
    }

    /// Register, start the widget credential session, open the roster
    ///
    /// The session starts before the roster opens, matching the source
    /// application's login ordering. On any failure the flow stays logged
    /// out.
    pub async fn login(&mut self, raw_id: &str) -> Result<()> {
        if self.local.is_some() {
            return Err(DomainError::ValidationError(
                "already logged in".to_string(),
            ));
        }

        let record = self.registration.register(raw_id).await?;
        let session = self.widget_context.start(&record);
        let roster = RosterScreen::open(
            record.clone(),
            Arc::clone(&self.directory),
            Arc::clone(&self.permissions),
        )
        .await?;

        info!(user_id = %record.id, "logged in");
        self.local = Some(record);
        self.session = Some(session);
        self.roster = Some(roster);
        Ok(())
    }

    pub fn local(&self) -> Option<&IdentityRecord> {
        self.local.as_ref()
    }

    pub fn roster(&self) -> Option<Roster> {
        self.roster.as_ref().map(|screen| screen.roster())
    }

    pub fn roster_updates(&self) -> Result<watch::Receiver<Roster>> {
        self.roster
            .as_ref()
            .map(|screen| screen.updates())
            .ok_or_else(|| DomainError::ValidationError("not logged in".to_string()))
    }

    /// Record a roster entry as the pending call target
    pub fn select_target(&mut self, target_id: &UserId) -> Result<()> {
        self.roster_screen_mut()?.select(target_id)
    }

    /// Place a call to the selected target in the given mode
    pub async fn place_call(&mut self, mode: CallMode) -> Result<CallOutcome> {
        let decision = {
            let screen = self.roster_screen_mut()?;
            match mode {
                CallMode::Voice => screen.request_voice().await?,
                CallMode::Video => screen.request_video().await?,
            }
        };

        match decision {
            LaunchDecision::Launched(request) => {
                let session = self.session.as_ref().filter(|s| s.is_active()).ok_or_else(
                    || DomainError::WidgetFailure("widget session not started".to_string()),
                )?;
                let session_id =
                    call_screen::launch(session.widget(), session.credentials(), &request)?;
                Ok(CallOutcome::Connected(session_id))
            }
            LaunchDecision::Denied(denied) => Ok(CallOutcome::PermissionsDenied(denied)),
            LaunchDecision::Abandoned => Ok(CallOutcome::Abandoned),
        }
    }

    /// Close the roster exactly once and stop the widget session
    ///
    /// Idempotent: a second logout is a no-op.
    pub async fn logout(&mut self) {
        if let Some(mut roster) = self.roster.take() {
            roster.close().await;
        }
        if let Some(mut session) = self.session.take() {
            session.stop();
        }
        if let Some(record) = self.local.take() {
            info!(user_id = %record.id, "logged out");
        }
    }

    fn roster_screen_mut(&mut self) -> Result<&mut RosterScreen> {
        self.roster
            .as_mut()
            .ok_or_else(|| DomainError::ValidationError("not logged in".to_string()))
    }
}
