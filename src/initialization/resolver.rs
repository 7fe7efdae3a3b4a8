//! DNS resolver initialization.

use std::sync::Arc;
use std::time::Duration;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;

use crate::config::DNS_ATTEMPTS;

/// Initializes the DNS resolver for hostname lookups.
///
/// Creates a resolver using the default upstream configuration with the
/// per-connection timeout applied to each query, so a slow name server can
/// never hold a worker longer than the probe deadline allows.
///
/// # Arguments
///
/// * `timeout` - Per-query timeout (the run's per-connection timeout)
///
/// # Returns
///
/// A configured `TokioAsyncResolver` wrapped in `Arc` for sharing across workers.
pub fn init_resolver(timeout: Duration) -> Arc<TokioAsyncResolver> {
    let mut opts = ResolverOpts::default();
    opts.timeout = timeout;
    opts.attempts = DNS_ATTEMPTS;
    // Prevent search domain appending
    opts.ndots = 0;

    Arc::new(TokioAsyncResolver::tokio(ResolverConfig::default(), opts))
}
