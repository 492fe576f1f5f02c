//! Registration - persist the local identity and hand it to the roster

use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::UserId;
use crate::domain::user::{IdentityRecord, UserDirectory};
use crate::interface::metrics;
use std::sync::Arc;
use tracing::{error, info};

/// Registration use case
pub struct RegistrationService {
    directory: Arc<dyn UserDirectory>,
}

impl RegistrationService {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    /// Register a user-chosen identifier
    ///
    /// Empty (after trimming) input fails validation before any store call
    /// is made. The upsert overwrites any existing record with the same id.
    /// On store failure the caller stays on the registration step; nothing
    /// is retried.
    pub async fn register(&self, raw_id: &str) -> Result<IdentityRecord> {
        let id = UserId::new(raw_id)?;
        let record = IdentityRecord::register(id);

        if let Err(e) = self.directory.upsert(&record).await {
            error!(user_id = %record.id, error = %e, "failed to persist identity record");
            return Err(e);
        }

        metrics::record_registration();
        info!(user_id = %record.id, "identity registered");
        Ok(record)
    }
}
