//! Identity record entity

use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::UserId;
use serde::{Deserialize, Serialize};

/// A registered user as persisted in the shared document store
///
/// Registration always sets `name == id`; the fields stay separate because
/// the store owns the record and a future writer may diverge them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub id: UserId,
    pub name: String,
}

impl IdentityRecord {
    /// Create the record written at registration time
    pub fn register(id: UserId) -> Self {
        let name = id.to_string();
        Self { id, name }
    }

    /// Encode for the document store
    pub fn to_document(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self)
            .map_err(|e| DomainError::ValidationError(format!("encode identity record: {}", e)))
    }

    /// Decode a single document out of a directory snapshot
    pub fn from_document(document: &serde_json::Value) -> Result<Self> {
        serde_json::from_value(document.clone())
            .map_err(|e| DomainError::ValidationError(format!("decode identity record: {}", e)))
    }
}
