//! User directory port - the live-subscribable identity collection

use super::entity::IdentityRecord;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::SubscriptionId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

/// Full-collection snapshot delivered on every store notification
///
/// Documents are raw JSON: decoding (and tolerance for malformed entries)
/// is the subscriber's concern, not the transport's.
#[derive(Debug, Clone)]
pub struct DirectorySnapshot {
    pub documents: Vec<serde_json::Value>,
    pub observed_at: DateTime<Utc>,
}

impl DirectorySnapshot {
    pub fn new(documents: Vec<serde_json::Value>) -> Self {
        Self {
            documents,
            observed_at: Utc::now(),
        }
    }
}

/// An open subscription: handle for teardown plus the snapshot stream
///
/// The stream ends when the store drops its sending side (unsubscribe or
/// connection loss). There is no pause/resume.
#[derive(Debug)]
pub struct DirectorySubscription {
    pub id: SubscriptionId,
    pub snapshots: mpsc::UnboundedReceiver<DirectorySnapshot>,
}

/// User directory trait
///
/// Subscriptions deliver the current snapshot immediately on subscribe and
/// a fresh full snapshot on every subsequent mutation (level-triggered, no
/// deltas).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Upsert an identity record at its id (overwrite semantics)
    async fn upsert(&self, record: &IdentityRecord) -> Result<()>;

    /// Subscribe to full-collection change notifications
    async fn subscribe_all(&self) -> Result<DirectorySubscription>;

    /// Tear down a subscription; unknown handles are tolerated
    async fn unsubscribe(&self, id: SubscriptionId) -> Result<()>;
}
