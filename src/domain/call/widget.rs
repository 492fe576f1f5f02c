//! Call widget port and its credential pair

use crate::domain::call::value_object::CallMode;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{CallSessionId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Widget signing string: 64 hexadecimal characters, validated at parse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppSign(String);

impl AppSign {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.len() != 64 {
            return Err(DomainError::ValidationError(format!(
                "app sign must be 64 hex characters, got {}",
                raw.len()
            )));
        }
        hex::decode(raw).map_err(|_| {
            DomainError::ValidationError("app sign contains non-hex characters".to_string())
        })?;
        Ok(Self(raw.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Long-lived application credential pair for the call widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallCredentials {
    app_id: u64,
    app_sign: AppSign,
}

impl CallCredentials {
    pub fn new(app_id: u64, app_sign: AppSign) -> Self {
        Self { app_id, app_sign }
    }

    pub fn app_id(&self) -> u64 {
        self.app_id
    }

    pub fn app_sign(&self) -> &AppSign {
        &self.app_sign
    }
}

/// Everything the widget needs for one call screen: one session, one peer,
/// one fixed mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallScreenSpec {
    pub session_id: CallSessionId,
    pub local_id: UserId,
    pub local_name: String,
    pub peer_id: UserId,
    pub peer_name: String,
    pub mode: CallMode,
}

/// Call widget trait
///
/// `open` hands the whole call lifecycle to the external widget; the host
/// gets no callback beyond the construction result. A failure here is fatal
/// to the call screen.
pub trait CallWidget: Send + Sync {
    fn open(&self, credentials: &CallCredentials, spec: &CallScreenSpec) -> Result<()>;
}
