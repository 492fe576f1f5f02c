//! Simulated OS permission subsystem
//!
//! A scriptable authorization ledger standing where the OS binding would:
//! a pre-authorized set, queued prompt replies, and a prompt counter so
//! tests can assert exactly how many prompts a flow issued.

use crate::domain::permission::{Capability, DevicePermissions, PermissionVerdict};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use tracing::debug;

#[derive(Default)]
pub struct SimulatedPermissions {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    authorized: HashSet<Capability>,
    replies: VecDeque<HashMap<Capability, bool>>,
    prompts_issued: usize,
}

impl SimulatedPermissions {
    /// Nothing authorized, no scripted replies: every prompt denies
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a capability as already authorized (no prompt needed)
    pub fn authorize(&self, capability: Capability) {
        self.inner.lock().unwrap().authorized.insert(capability);
    }

    /// Queue the reply for the next prompt
    pub fn push_reply<I>(&self, reply: I)
    where
        I: IntoIterator<Item = (Capability, bool)>,
    {
        self.inner
            .lock()
            .unwrap()
            .replies
            .push_back(reply.into_iter().collect());
    }

    pub fn prompts_issued(&self) -> usize {
        self.inner.lock().unwrap().prompts_issued
    }
}

#[async_trait]
impl DevicePermissions for SimulatedPermissions {
    fn is_authorized(&self, capability: Capability) -> bool {
        self.inner.lock().unwrap().authorized.contains(&capability)
    }

    async fn request(&self, capabilities: &[Capability]) -> PermissionVerdict {
        let mut inner = self.inner.lock().unwrap();
        inner.prompts_issued += 1;

        // One prompt answers every requested capability at once.
        let reply = inner
            .replies
            .pop_front()
            .unwrap_or_else(|| capabilities.iter().map(|c| (*c, false)).collect());

        // The OS remembers grants across prompts.
        for (capability, granted) in &reply {
            if *granted {
                inner.authorized.insert(*capability);
            }
        }

        debug!(reply = ?reply, "permission prompt resolved");
        PermissionVerdict::new(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unscripted_prompt_denies_everything() {
        let permissions = SimulatedPermissions::new();
        let verdict = permissions.request(&Capability::REQUIRED_FOR_CALLS).await;

        assert!(!verdict.all_granted(&Capability::REQUIRED_FOR_CALLS));
        assert_eq!(permissions.prompts_issued(), 1);
    }

    #[tokio::test]
    async fn test_granted_capability_stays_authorized() {
        let permissions = SimulatedPermissions::new();
        permissions.push_reply([
            (Capability::Camera, true),
            (Capability::Microphone, true),
        ]);

        let _ = permissions.request(&Capability::REQUIRED_FOR_CALLS).await;
        assert!(permissions.is_authorized(Capability::Camera));
        assert!(permissions.is_authorized(Capability::Microphone));
    }
}
