//! Session orchestration.
//!
//! [`SessionState`] is the synchronous transition table; it can be driven
//! directly in tests. [`SessionOrchestrator`] wraps it in a lock and drives
//! the ports, applying every completion through the same lease check.

mod orchestrator;
mod state;

pub use orchestrator::{SessionDeps, SessionOrchestrator};
pub use state::{GenerationTicket, Outcome, SessionSnapshot, SessionState, UploadTicket};
