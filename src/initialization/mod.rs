//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources of a run:
//! - Logger
//! - DNS resolver
//! - TLS crypto provider

mod logger;
mod resolver;

use std::sync::Arc;

use rustls::crypto::{ring::default_provider, CryptoProvider};

// Re-export public API
pub use logger::init_logger_with;
pub use resolver::init_resolver;

/// Returns the crypto provider used for every probe handshake.
///
/// Probes build their TLS configuration from this provider explicitly, so
/// they do not depend on a process-wide default being installed.
pub fn init_tls_provider() -> Arc<CryptoProvider> {
    Arc::new(default_provider())
}
