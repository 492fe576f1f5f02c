//! Metrics helpers
//!
//! The `metrics` facade only; the host shell decides whether a recorder is
//! installed.

use metrics::{counter, gauge};

/// Record a successful identity registration
pub fn record_registration() {
    counter!("registrations_total").increment(1);
}

/// Track the number of users visible in the roster
pub fn update_roster_size(size: usize) {
    gauge!("roster_visible_users").set(size as f64);
}

/// Record one batched device authorization prompt
pub fn record_permission_prompt() {
    counter!("permission_prompts_total").increment(1);
}

/// Record a call launch outcome ("launched" or "denied")
pub fn record_call_launch(outcome: &str) {
    counter!("call_launches_total", "outcome" => outcome.to_string()).increment(1);
}
