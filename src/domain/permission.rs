//! Device permission port - OS-level capability authorization

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Device capability a call depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Camera,
    Microphone,
}

impl Capability {
    /// Both capabilities are requested for every call, voice included,
    /// matching the source application.
    pub const REQUIRED_FOR_CALLS: [Capability; 2] = [Capability::Camera, Capability::Microphone];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Camera => "camera",
            Capability::Microphone => "microphone",
        }
    }
}

/// Per-capability grant/deny result of a single prompt resolution
#[derive(Debug, Clone, Default)]
pub struct PermissionVerdict {
    grants: HashMap<Capability, bool>,
}

impl PermissionVerdict {
    pub fn new(grants: HashMap<Capability, bool>) -> Self {
        Self { grants }
    }

    pub fn is_granted(&self, capability: Capability) -> bool {
        self.grants.get(&capability).copied().unwrap_or(false)
    }

    pub fn all_granted(&self, requested: &[Capability]) -> bool {
        requested.iter().all(|c| self.is_granted(*c))
    }

    /// Capabilities the user denied, for the user-visible message
    pub fn denied(&self) -> Vec<Capability> {
        let mut denied: Vec<Capability> = self
            .grants
            .iter()
            .filter(|(_, granted)| !**granted)
            .map(|(capability, _)| *capability)
            .collect();
        denied.sort_by_key(|c| c.as_str());
        denied
    }
}

/// OS permission subsystem trait
///
/// `request` issues one batched prompt for all listed capabilities and
/// resolves exactly once; there is no way to dismiss it programmatically.
#[async_trait]
pub trait DevicePermissions: Send + Sync {
    /// Current authorization, no prompt issued
    fn is_authorized(&self, capability: Capability) -> bool;

    /// Single-shot batched authorization prompt
    async fn request(&self, capabilities: &[Capability]) -> PermissionVerdict;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_all_granted() {
        let verdict = PermissionVerdict::new(
            [(Capability::Camera, true), (Capability::Microphone, true)].into(),
        );
        assert!(verdict.all_granted(&Capability::REQUIRED_FOR_CALLS));
        assert!(verdict.denied().is_empty());
    }

    #[test]
    fn test_verdict_partial_denial() {
        let verdict = PermissionVerdict::new(
            [(Capability::Camera, true), (Capability::Microphone, false)].into(),
        );
        assert!(!verdict.all_granted(&Capability::REQUIRED_FOR_CALLS));
        assert_eq!(verdict.denied(), vec![Capability::Microphone]);
    }

    #[test]
    fn test_missing_capability_counts_as_denied() {
        let verdict = PermissionVerdict::new([(Capability::Camera, true)].into());
        assert!(!verdict.all_granted(&Capability::REQUIRED_FOR_CALLS));
    }
}
