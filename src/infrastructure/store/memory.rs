//! In-process document store
//!
//! The default shell backend and the test twin of the remote store: a keyed
//! document map that fans a full snapshot out to every subscriber on each
//! mutation, and immediately on subscribe.

use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::SubscriptionId;
use crate::domain::user::{DirectorySnapshot, DirectorySubscription, IdentityRecord, UserDirectory};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Clone, Default)]
pub struct MemoryDirectory {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    documents: BTreeMap<String, serde_json::Value>,
    subscribers: HashMap<SubscriptionId, mpsc::UnboundedSender<DirectorySnapshot>>,
}

impl Inner {
    fn snapshot(&self) -> DirectorySnapshot {
        DirectorySnapshot::new(self.documents.values().cloned().collect())
    }

    fn fan_out(&mut self) {
        let snapshot = self.snapshot();
        // A send only fails when the receiver is gone; prune those.
        self.subscribers
            .retain(|_, tx| tx.send(snapshot.clone()).is_ok());
    }
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw document, bypassing identity validation
    ///
    /// Lets tests seed the collection with malformed documents the way a
    /// foreign writer could.
    pub fn insert_raw(&self, key: &str, document: serde_json::Value) {
        let mut inner = self.inner.lock().unwrap();
        inner.documents.insert(key.to_string(), document);
        inner.fan_out();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn document(&self, key: &str) -> Option<serde_json::Value> {
        self.inner.lock().unwrap().documents.get(key).cloned()
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn upsert(&self, record: &IdentityRecord) -> Result<()> {
        let document = record.to_document()?;
        debug!(user_id = %record.id, "upserting identity record");
        self.insert_raw(record.id.as_str(), document);
        Ok(())
    }

    async fn subscribe_all(&self) -> Result<DirectorySubscription> {
        let id = SubscriptionId::new();
        let (tx, rx) = mpsc::unbounded_channel();

        let mut inner = self.inner.lock().unwrap();
        // Current state is delivered immediately; the subscriber does not
        // wait for the next mutation.
        let _ = tx.send(inner.snapshot());
        inner.subscribers.insert(id, tx);

        debug!(subscription = %id, "directory subscription opened");
        Ok(DirectorySubscription { id, snapshots: rx })
    }

    async fn unsubscribe(&self, id: SubscriptionId) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.subscribers.remove(&id).is_none() {
            warn!(subscription = %id, "unsubscribe for unknown subscription");
        }
        Ok(())
    }
}
