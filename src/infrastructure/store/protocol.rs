//! Remote store wire protocol
//!
//! JSON text frames over one WebSocket. Client requests carry a `seq`
//! number, monotonic per connection; the server answers each with `ack` or
//! `error`. Snapshot pushes are keyed by subscription id and live outside
//! the seq space.

use serde::{Deserialize, Serialize};

/// The only collection this client touches
pub const USERS_COLLECTION: &str = "users";

/// Client-to-server request frames
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum ClientRequest {
    Upsert {
        seq: u64,
        collection: String,
        key: String,
        document: serde_json::Value,
    },
    Subscribe {
        seq: u64,
        collection: String,
    },
    Unsubscribe {
        seq: u64,
        sub: String,
    },
}

/// Server-to-client frames
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum ServerMessage {
    Ack {
        seq: u64,
        /// Present only on subscribe acks
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sub: Option<String>,
    },
    Error {
        seq: u64,
        message: String,
    },
    Snapshot {
        sub: String,
        documents: Vec<serde_json::Value>,
    },
}
