//! Event emitter trait for session events.
//!
//! Implementations decide the transport (channel, log lines, UI bridge).

use tokio::sync::mpsc;

use crate::events::SessionEvent;

/// Sink for [`SessionEvent`]s.
///
/// `emit` must not block; the orchestrator calls it outside its state lock
/// but from inside async operations.
pub trait SessionEventEmitter: Send + Sync {
    fn emit(&self, event: SessionEvent);

    /// Clone this emitter into a boxed trait object.
    fn clone_box(&self) -> Box<dyn SessionEventEmitter>;
}

/// Discards every event.
#[derive(Debug, Clone, Default)]
pub struct NoopEmitter;

impl NoopEmitter {
    pub const fn new() -> Self {
        Self
    }
}

impl SessionEventEmitter for NoopEmitter {
    fn emit(&self, _event: SessionEvent) {}

    fn clone_box(&self) -> Box<dyn SessionEventEmitter> {
        Box::new(self.clone())
    }
}

/// Forwards events into an unbounded tokio channel.
///
/// Events sent after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl ChannelEmitter {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl SessionEventEmitter for ChannelEmitter {
    fn emit(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }

    fn clone_box(&self) -> Box<dyn SessionEventEmitter> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn noop_emitter_accepts_events() {
        let emitter = NoopEmitter::new();
        emitter.emit(SessionEvent::SelectionCleared);
        let _boxed = emitter.clone_box();
    }

    #[test]
    fn channel_emitter_delivers_in_order() {
        let (emitter, mut rx) = ChannelEmitter::new();
        let emitter: Arc<dyn SessionEventEmitter> = Arc::new(emitter);
        emitter.emit(SessionEvent::BusyChanged { busy: true });
        emitter.clone_box().emit(SessionEvent::BusyChanged { busy: false });

        assert_eq!(rx.try_recv().ok(), Some(SessionEvent::BusyChanged { busy: true }));
        assert_eq!(rx.try_recv().ok(), Some(SessionEvent::BusyChanged { busy: false }));
    }

    #[test]
    fn channel_emitter_survives_dropped_receiver() {
        let (emitter, rx) = ChannelEmitter::new();
        drop(rx);
        emitter.emit(SessionEvent::ReferenceCleared);
    }
}
