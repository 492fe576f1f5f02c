//! Roster - the visible list of other registered users
//!
//! Entirely derived state: rebuilt in full from every directory snapshot,
//! never patched incrementally.

use crate::domain::shared::value_objects::UserId;
use crate::domain::user::{DirectorySnapshot, IdentityRecord};
use serde::Serialize;
use tracing::warn;

/// One selectable row in the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub id: UserId,
    pub name: String,
}

/// The roster visible to the local user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    /// Rebuild the roster wholesale from a directory snapshot
    ///
    /// Malformed documents are skipped (warn, continue), never fatal to the
    /// batch. The local identity is excluded. Entries are sorted by id so
    /// two rebuilds of the same set compare equal regardless of input order.
    pub fn from_snapshot(snapshot: &DirectorySnapshot, local_id: &UserId) -> Self {
        let mut entries = Vec::with_capacity(snapshot.documents.len());
        for document in &snapshot.documents {
            let record = match IdentityRecord::from_document(document) {
                Ok(record) => record,
                Err(e) => {
                    warn!(error = %e, "skipping malformed directory document");
                    continue;
                }
            };
            if record.id == *local_id {
                continue;
            }
            entries.push(RosterEntry {
                id: record.id,
                name: record.name,
            });
        }
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        entries.dedup_by(|a, b| a.id == b.id);
        Self { entries }
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn find(&self, id: &UserId) -> Option<&RosterEntry> {
        self.entries.iter().find(|entry| entry.id == *id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(documents: Vec<serde_json::Value>) -> DirectorySnapshot {
        DirectorySnapshot::new(documents)
    }

    fn user(id: &str) -> serde_json::Value {
        json!({ "id": id, "name": id })
    }

    #[test]
    fn test_local_user_is_excluded() {
        let local = UserId::new("bob").unwrap();
        let roster = Roster::from_snapshot(
            &snapshot(vec![user("alice"), user("bob"), user("carol")]),
            &local,
        );

        let ids: Vec<&str> = roster.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["alice", "carol"]);
    }

    #[test]
    fn test_rebuild_is_order_independent() {
        let local = UserId::new("bob").unwrap();
        let forward = Roster::from_snapshot(
            &snapshot(vec![user("alice"), user("carol"), user("dave")]),
            &local,
        );
        let reversed = Roster::from_snapshot(
            &snapshot(vec![user("dave"), user("carol"), user("alice")]),
            &local,
        );
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_malformed_documents_are_skipped() {
        let local = UserId::new("bob").unwrap();
        let roster = Roster::from_snapshot(
            &snapshot(vec![
                user("alice"),
                json!({ "unexpected": 42 }),
                json!({ "id": "", "name": "" }),
                user("carol"),
            ]),
            &local,
        );

        let ids: Vec<&str> = roster.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["alice", "carol"]);
    }

    #[test]
    fn test_empty_snapshot_yields_empty_roster() {
        let local = UserId::new("bob").unwrap();
        let roster = Roster::from_snapshot(&snapshot(vec![]), &local);
        assert!(roster.is_empty());
    }
}
