//! Hostname resolution.
//!
//! Workers resolve names through the [`HostResolver`] seam so the network
//! resolver can be swapped for a fixed table:
//! - `TokioAsyncResolver` (hickory) for real runs, see
//!   [`crate::initialization::init_resolver`]
//! - [`StaticResolver`] for offline runs against known addresses

use std::collections::HashMap;
use std::future::Future;
use std::net::IpAddr;

use hickory_resolver::TokioAsyncResolver;
use thiserror::Error;

/// A failed name lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct LookupError {
    message: String,
}

impl LookupError {
    /// Creates a lookup error carrying the resolver's message.
    pub fn new(message: impl Into<String>) -> Self {
        LookupError {
            message: message.into(),
        }
    }
}

/// Resolves a hostname to the addresses a probe may connect to.
pub trait HostResolver: Send + Sync + 'static {
    /// Looks up `host`, returning every address found in resolver order.
    fn lookup(&self, host: &str)
        -> impl Future<Output = Result<Vec<IpAddr>, LookupError>> + Send;
}

impl HostResolver for TokioAsyncResolver {
    fn lookup(
        &self,
        host: &str,
    ) -> impl Future<Output = Result<Vec<IpAddr>, LookupError>> + Send {
        async move {
            let response = self
                .lookup_ip(host)
                .await
                .map_err(|e| LookupError::new(e.to_string()))?;
            Ok(response.iter().collect())
        }
    }
}

/// Resolver answering from a fixed host table.
///
/// Names are matched case-insensitively; any name not in the table fails the
/// way an NXDOMAIN answer would.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    table: HashMap<String, Vec<IpAddr>>,
}

impl StaticResolver {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an address for `host`.
    pub fn insert(&mut self, host: &str, addr: IpAddr) -> &mut Self {
        self.table
            .entry(host.to_ascii_lowercase())
            .or_default()
            .push(addr);
        self
    }

    /// Builder form of [`StaticResolver::insert`].
    pub fn with(mut self, host: &str, addr: IpAddr) -> Self {
        self.insert(host, addr);
        self
    }
}

impl HostResolver for StaticResolver {
    fn lookup(
        &self,
        host: &str,
    ) -> impl Future<Output = Result<Vec<IpAddr>, LookupError>> + Send {
        let result = match self.table.get(&host.to_ascii_lowercase()) {
            Some(addrs) => Ok(addrs.clone()),
            None => Err(LookupError::new(format!("no record found for {host}"))),
        };
        std::future::ready(result)
    }
}
