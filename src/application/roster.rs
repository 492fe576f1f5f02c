//! Roster screen - live roster synchronization plus the selection cursor
//!
//! Subscribes once for the screen's lifetime; every snapshot replaces the
//! visible roster wholesale. Selection is two-step: pick a target, then
//! request voice or video.

use crate::application::launcher::{CallLauncher, LaunchDecision};
use crate::domain::call::{CallMode, PendingCall};
use crate::domain::permission::DevicePermissions;
use crate::domain::roster::Roster;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{SubscriptionId, UserId};
use crate::domain::user::{DirectorySnapshot, IdentityRecord, UserDirectory};
use crate::interface::metrics;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub struct RosterScreen {
    local: IdentityRecord,
    directory: Arc<dyn UserDirectory>,
    roster_rx: watch::Receiver<Roster>,
    // Taken on close so teardown happens exactly once.
    subscription: Option<SubscriptionId>,
    consumer: Option<JoinHandle<()>>,
    alive: Arc<AtomicBool>,
    selection: Option<(UserId, String)>,
    launcher: CallLauncher,
}

impl RosterScreen {
    /// Open the screen: subscribe to the directory and start the consumer
    /// task that rebuilds the roster on every snapshot.
    pub async fn open(
        local: IdentityRecord,
        directory: Arc<dyn UserDirectory>,
        permissions: Arc<dyn DevicePermissions>,
    ) -> Result<Self> {
        let subscription = directory.subscribe_all().await?;
        let (roster_tx, roster_rx) = watch::channel(Roster::default());
        let alive = Arc::new(AtomicBool::new(true));

        let consumer = tokio::spawn(consume_snapshots(
            subscription.snapshots,
            roster_tx,
            local.id.clone(),
            Arc::clone(&alive),
        ));

        info!(user_id = %local.id, subscription = %subscription.id, "roster screen opened");

        let launcher = CallLauncher::new(local.clone(), permissions);
        Ok(Self {
            local,
            directory,
            roster_rx,
            subscription: Some(subscription.id),
            consumer: Some(consumer),
            alive,
            selection: None,
            launcher,
        })
    }

    pub fn local(&self) -> &IdentityRecord {
        &self.local
    }

    /// Current roster snapshot
    pub fn roster(&self) -> Roster {
        self.roster_rx.borrow().clone()
    }

    /// Watch the roster; every published value is a wholesale replacement
    pub fn updates(&self) -> watch::Receiver<Roster> {
        self.roster_rx.clone()
    }

    /// Record a roster entry as the pending call target
    ///
    /// Selecting a new entry silently replaces the previous one.
    pub fn select(&mut self, target_id: &UserId) -> Result<()> {
        let entry = self
            .roster_rx
            .borrow()
            .find(target_id)
            .cloned()
            .ok_or_else(|| {
                DomainError::ValidationError(format!("user {} is not in the roster", target_id))
            })?;

        info!(target = %entry.id, "call target selected");
        self.selection = Some((entry.id, entry.name));
        Ok(())
    }

    pub fn selected(&self) -> Option<&UserId> {
        self.selection.as_ref().map(|(id, _)| id)
    }

    pub async fn request_voice(&mut self) -> Result<LaunchDecision> {
        self.request_call(CallMode::Voice).await
    }

    pub async fn request_video(&mut self) -> Result<LaunchDecision> {
        self.request_call(CallMode::Video).await
    }

    /// Run the permission-gated launch for the selected target
    ///
    /// The selection is consumed: cleared once a launch is attempted or
    /// permissions are denied.
    async fn request_call(&mut self, mode: CallMode) -> Result<LaunchDecision> {
        let Some((target_id, target_name)) = self.selection.take() else {
            return Err(DomainError::ValidationError(
                "no call target selected".to_string(),
            ));
        };

        let call = PendingCall {
            target_id,
            target_name,
            mode,
        };
        let decision = self.launcher.launch(call).await?;

        if !self.alive.load(Ordering::SeqCst) {
            debug!("discarding launch decision for a torn-down screen");
            return Ok(LaunchDecision::Abandoned);
        }
        Ok(decision)
    }

    /// Tear the screen down: unsubscribe exactly once and stop the consumer
    ///
    /// Idempotent. A snapshot already queued at teardown is dropped by the
    /// consumer's liveness guard without touching screen state.
    pub async fn close(&mut self) {
        self.alive.store(false, Ordering::SeqCst);

        if let Some(id) = self.subscription.take() {
            if let Err(e) = self.directory.unsubscribe(id).await {
                warn!(subscription = %id, error = %e, "directory unsubscribe failed");
            }
            info!(user_id = %self.local.id, subscription = %id, "roster screen closed");
        }

        if let Some(consumer) = self.consumer.take() {
            // The store dropping its sender ends the snapshot stream, so the
            // consumer drains and exits on its own.
            let _ = consumer.await;
        }
    }
}

/// Replace-on-notify reducer: each snapshot rebuilds the roster wholesale.
/// Snapshots are processed strictly in order; one delivered after teardown
/// is a guarded no-op.
async fn consume_snapshots(
    mut snapshots: mpsc::UnboundedReceiver<DirectorySnapshot>,
    roster_tx: watch::Sender<Roster>,
    local_id: UserId,
    alive: Arc<AtomicBool>,
) {
    while let Some(snapshot) = snapshots.recv().await {
        if !alive.load(Ordering::SeqCst) {
            debug!("dropping directory snapshot delivered after screen teardown");
            continue;
        }

        let roster = Roster::from_snapshot(&snapshot, &local_id);
        debug!(visible = roster.len(), "roster rebuilt from snapshot");
        metrics::update_roster_size(roster.len());
        if roster_tx.send(roster).is_err() {
            break;
        }
    }
    debug!("roster snapshot stream ended");
}
