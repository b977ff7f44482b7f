//! Outline Server - a collaborative outline over HTTP
//!
//! Maintains a mutable tree of text nodes identified by hierarchical
//! path keys, plus a bounded log of recently-changed keys that clients
//! poll for change notification.
#![warn(missing_docs)]

// Core foundational modules
pub mod core;

// Main functional modules
pub mod outline;
pub mod api;

// Re-export commonly used items for convenience
pub use crate::core::{Config, Error, Result};
pub use crate::outline::{NodeKey, OutlineStore};

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize tracing for the server process.
///
/// `RUST_LOG` takes precedence over the configured default level.
pub fn init_tracing(default_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Initializing {} v{}", NAME, VERSION);
}
