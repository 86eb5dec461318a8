//! Lease tokens for supersession.
//!
//! Every reference session, generation job and catalog refresh is stamped
//! with a lease when it starts. Completions carry the lease back; if the
//! session has since minted a newer one, the completion is stale and its
//! result is dropped instead of applied.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Monotonic supersession token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaseId(u64);

impl LeaseId {
    /// Raw counter value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LeaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Mints strictly increasing [`LeaseId`]s.
///
/// Lives inside the session state, so no atomics are needed.
#[derive(Debug, Default)]
pub struct LeaseCounter {
    last: u64,
}

impl LeaseCounter {
    pub const fn new() -> Self {
        Self { last: 0 }
    }

    /// Mint the next lease.
    pub fn mint(&mut self) -> LeaseId {
        self.last += 1;
        LeaseId(self.last)
    }
}
