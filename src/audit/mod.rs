//! Audit worker.
//!
//! [`probe`] performs one TLS probe against one hostname: resolve, connect,
//! handshake with trust evaluation skipped, audit whatever chain the server
//! presented, and classify any failure. It always produces exactly one
//! [`AuditResult`] and never returns an error.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use rustls::crypto::CryptoProvider;
use rustls::pki_types::ServerName;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::Instant;

use crate::chain::{is_mismatched, AuthorityExpectation, CertificateChain};
use crate::dns::{HostResolver, LookupError};
use crate::error_handling::{categorize_probe_error, FailureClass, ProbeError};
use crate::tls::{handshake, tls_version_label, Handshake};

/// Everything a worker needs to probe a host, shared read-only by the pool.
pub struct ProbeContext<R> {
    /// Issuer to intermediate table, built once per run
    pub expectations: Arc<AuthorityExpectation>,
    /// Name resolver
    pub resolver: Arc<R>,
    /// Crypto provider for the handshake
    pub provider: Arc<CryptoProvider>,
    /// Per-connection deadline (resolution, connect and handshake)
    pub timeout: Duration,
    /// Port probed on every host
    pub port: u16,
    /// Log the full chain of every mismatch
    pub verbose: bool,
}

/// The outcome of auditing one hostname.
///
/// `mismatched` and `reachable` are independent: the chain is audited as
/// soon as it is presented, so a mismatch survives a handshake that fails
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    /// Hostname as dispatched
    pub hostname: String,
    /// The TLS handshake completed
    pub reachable: bool,
    /// The presented chain lacks the intermediate required for the leaf's issuer
    pub mismatched: bool,
    /// Negotiated protocol version (`"1.2"`, `"1.3"`) when reachable
    pub tls_version: Option<String>,
    /// Address of the peer once the TCP connection was established
    pub peer_ip: Option<String>,
    /// Why the host was unreachable
    pub failure_class: FailureClass,
    /// Number of parseable certificates the peer presented
    pub chain_length: usize,
    /// Subject label of the presented leaf
    pub leaf_subject: Option<String>,
}

impl AuditResult {
    /// A result for `hostname` before anything is known about it.
    pub fn new(hostname: impl Into<String>) -> Self {
        AuditResult {
            hostname: hostname.into(),
            reachable: false,
            mismatched: false,
            tls_version: None,
            peer_ip: None,
            failure_class: FailureClass::None,
            chain_length: 0,
            leaf_subject: None,
        }
    }

    /// True when the peer presented a leaf and nothing else.
    pub fn is_leaf_only(&self) -> bool {
        self.chain_length == 1
    }

    fn unreachable(mut self, error: &ProbeError) -> Self {
        self.reachable = false;
        self.failure_class = categorize_probe_error(error);
        debug!(
            "{} unreachable ({}): {error}",
            self.hostname, self.failure_class
        );
        self
    }
}

/// Resolves `hostname`, skipping the resolver for IP literals.
async fn resolve<R: HostResolver>(
    hostname: &str,
    resolver: &R,
    deadline: Instant,
) -> Result<Vec<IpAddr>, ProbeError> {
    if let Ok(ip) = hostname.parse::<IpAddr>() {
        return Ok(vec![ip]);
    }
    let addrs = tokio::time::timeout_at(deadline, resolver.lookup(hostname))
        .await
        .map_err(|_| LookupError::new(format!("lookup of {hostname} timed out")))??;
    if addrs.is_empty() {
        return Err(ProbeError::NoAddresses);
    }
    Ok(addrs)
}

/// Opens a TCP connection to the first address of `hostname` that accepts.
async fn connect<R: HostResolver>(
    hostname: &str,
    ctx: &ProbeContext<R>,
    deadline: Instant,
) -> Result<TcpStream, ProbeError> {
    let addrs = resolve(hostname, ctx.resolver.as_ref(), deadline).await?;

    let mut last_error = ProbeError::NoAddresses;
    for ip in addrs {
        let addr = SocketAddr::new(ip, ctx.port);
        match tokio::time::timeout_at(deadline, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => return Ok(stream),
            Ok(Err(e)) => {
                debug!("Failed to connect to {hostname} at {addr}: {e}");
                last_error = ProbeError::Connect(e);
            }
            Err(_) => return Err(ProbeError::ConnectTimeout),
        }
    }
    Err(last_error)
}

/// Probes one hostname and audits the chain it presents.
///
/// The whole probe (resolution, TCP connect and TLS handshake) shares one
/// deadline of `ctx.timeout`. The connection is closed before returning on
/// every path.
///
/// # Arguments
///
/// * `hostname` - Host to probe on `ctx.port`
/// * `ctx` - Shared expectations, resolver and connection settings
pub async fn probe<R: HostResolver>(hostname: String, ctx: &ProbeContext<R>) -> AuditResult {
    let deadline = Instant::now() + ctx.timeout;
    let mut result = AuditResult::new(hostname);

    let server_name = match ServerName::try_from(result.hostname.clone()) {
        Ok(name) => name,
        Err(e) => {
            let error = ProbeError::InvalidServerName(e.to_string());
            return result.unreachable(&error);
        }
    };

    let stream = match connect(&result.hostname, ctx, deadline).await {
        Ok(stream) => stream,
        Err(e) => return result.unreachable(&e),
    };
    result.peer_ip = stream.peer_addr().ok().map(|addr| addr.ip().to_string());

    let Handshake { presented, outcome } =
        handshake(stream, server_name, &ctx.provider, deadline).await;

    let chain = CertificateChain::from_der(&presented);
    result.chain_length = chain.len();
    result.leaf_subject = chain.leaf().map(|leaf| leaf.subject.clone());
    result.mismatched = is_mismatched(&chain, &ctx.expectations);
    if result.mismatched && ctx.verbose {
        info!("Mismatched chain for {}: {}", result.hostname, chain.describe());
    }

    match outcome {
        Ok(mut tls_stream) => {
            result.tls_version = tls_stream
                .get_ref()
                .1
                .protocol_version()
                .map(tls_version_label);
            result.reachable = true;
            // Best-effort close_notify; the socket is dropped either way
            let _ = tokio::time::timeout_at(deadline, tls_stream.shutdown()).await;
            debug!(
                "{} reachable over TLS {}",
                result.hostname,
                result.tls_version.as_deref().unwrap_or("unknown")
            );
            result
        }
        Err(e) => result.unreachable(&e),
    }
}
