#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// DefaultBackendClient is used through CloneBackendPort, not its generic
// structure
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod port;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::DefaultBackendClient;

// Configuration
pub use config::{BackendClientConfig, DEFAULT_BASE_URL};

// Construction errors
pub use error::HttpError;

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio as _;
#[cfg(test)]
use tokio_test as _;
