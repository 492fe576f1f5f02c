//! Call screen bootstrap - derive the session id and delegate to the widget

use crate::domain::call::{CallCredentials, CallScreenSpec, CallWidget, LaunchRequest};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{CallSessionId, UserId};
use tracing::{debug, error, info};

/// Bring up the call screen for one launch request
///
/// The request arrived as plain strings across the screen boundary, so the
/// participant ids are re-validated here; an empty one is a navigation
/// error and aborts the screen. Everything after `open` - capture,
/// signaling, rendering, in-call controls, termination - belongs to the
/// widget.
pub fn launch(
    widget: &dyn CallWidget,
    credentials: &CallCredentials,
    request: &LaunchRequest,
) -> Result<CallSessionId> {
    let local_id = UserId::new(&request.local_id)
        .map_err(|_| DomainError::MissingParticipant("local user id is empty".to_string()))?;
    let target_id = UserId::new(&request.target_id)
        .map_err(|_| DomainError::MissingParticipant("target user id is empty".to_string()))?;

    let local_name = if request.local_name.trim().is_empty() {
        local_id.to_string()
    } else {
        request.local_name.clone()
    };
    let target_name = if request.target_name.trim().is_empty() {
        target_id.to_string()
    } else {
        request.target_name.clone()
    };

    let session_id = CallSessionId::between(&local_id, &target_id);
    debug!(session_id = %session_id, "derived call session id");

    let spec = CallScreenSpec {
        session_id: session_id.clone(),
        local_id,
        local_name,
        peer_id: target_id,
        peer_name: target_name,
        mode: request.mode,
    };

    if let Err(e) = widget.open(credentials, &spec) {
        error!(session_id = %session_id, error = %e, "call widget failed to open");
        return Err(e);
    }

    info!(
        session_id = %session_id,
        peer = %spec.peer_id,
        mode = spec.mode.as_str(),
        "call screen delegated to widget"
    );
    Ok(session_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::call::{AppSign, CallMode};
    use crate::infrastructure::callkit::RecordingWidget;

    fn credentials() -> CallCredentials {
        let sign = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
        CallCredentials::new(1, AppSign::parse(sign).unwrap())
    }

    fn request(local: &str, target: &str) -> LaunchRequest {
        LaunchRequest {
            local_id: local.to_string(),
            local_name: local.to_string(),
            target_id: target.to_string(),
            target_name: target.to_string(),
            mode: CallMode::Video,
        }
    }

    #[test]
    fn test_session_id_matches_for_both_directions() {
        let widget = RecordingWidget::new();

        let ab = launch(&widget, &credentials(), &request("alice", "bob")).unwrap();
        let ba = launch(&widget, &credentials(), &request("bob", "alice")).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.as_str(), "alice_bob");
    }

    #[test]
    fn test_empty_participant_id_is_fatal() {
        let widget = RecordingWidget::new();

        let missing_target = launch(&widget, &credentials(), &request("alice", ""));
        assert!(matches!(
            missing_target,
            Err(DomainError::MissingParticipant(_))
        ));

        let missing_local = launch(&widget, &credentials(), &request("", "bob"));
        assert!(matches!(
            missing_local,
            Err(DomainError::MissingParticipant(_))
        ));
        assert!(widget.launches().is_empty());
    }

    #[test]
    fn test_empty_target_name_falls_back_to_id() {
        let widget = RecordingWidget::new();
        let mut req = request("alice", "bob");
        req.target_name = String::new();

        launch(&widget, &credentials(), &req).unwrap();
        let launches = widget.launches();
        assert_eq!(launches.len(), 1);
        assert_eq!(launches[0].peer_name, "bob");
    }
}
