//! Session events as log lines.

use tracing::{debug, info, warn};
use voxclone_core::{SessionEvent, SessionEventEmitter};

/// Writes each [`SessionEvent`] to the tracing subscriber.
///
/// Failures and discarded completions go to `warn`, busy flips to `debug`,
/// everything else to `info`. The full event is attached as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEmitter;

impl SessionEventEmitter for TracingEmitter {
    fn emit(&self, event: SessionEvent) {
        let payload = serde_json::to_string(&event).unwrap_or_default();
        match &event {
            SessionEvent::GenerationFailed { .. }
            | SessionEvent::OperationFailed { .. }
            | SessionEvent::StaleCompletionDiscarded { .. } => {
                warn!(event = event.name(), %payload, "Session event");
            }
            SessionEvent::BusyChanged { .. } => {
                debug!(event = event.name(), %payload, "Session event");
            }
            _ => info!(event = event.name(), %payload, "Session event"),
        }
    }

    fn clone_box(&self) -> Box<dyn SessionEventEmitter> {
        Box::new(*self)
    }
}
