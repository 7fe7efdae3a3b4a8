//! TLS handshake with chain capture.
//!
//! Runs a client handshake that skips trust evaluation and hands back the
//! certificate chain exactly as the server presented it, whether or not the
//! handshake completes. Uses `tokio-rustls` with an explicit crypto
//! provider; certificates are parsed later by [`crate::chain`].

mod verifier;

use std::sync::Arc;

use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, ServerName};
use rustls::{ClientConfig, ProtocolVersion};
use tokio::net::TcpStream;
use tokio::time::Instant;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;

use crate::error_handling::ProbeError;

use verifier::ChainCapture;

/// Outcome of one handshake attempt.
///
/// `presented` is filled as soon as the server's Certificate message has
/// been processed, independently of `outcome`.
pub struct Handshake {
    /// Raw chain as sent by the peer, leaf first; empty if none arrived
    pub presented: Vec<CertificateDer<'static>>,
    /// The established stream, or why the handshake failed
    pub outcome: Result<TlsStream<TcpStream>, ProbeError>,
}

fn client_config(
    provider: &Arc<CryptoProvider>,
    capture: Arc<ChainCapture>,
) -> Result<ClientConfig, ProbeError> {
    let config = ClientConfig::builder_with_provider(Arc::clone(provider))
        .with_safe_default_protocol_versions()?
        .dangerous()
        .with_custom_certificate_verifier(capture)
        .with_no_client_auth();
    Ok(config)
}

/// Performs a TLS handshake over `stream`, bounded by `deadline`.
///
/// # Arguments
///
/// * `stream` - Connected TCP stream to the peer
/// * `server_name` - Name sent as SNI (IP addresses send none)
/// * `provider` - Crypto provider for the client configuration
/// * `deadline` - Instant after which the handshake is abandoned
pub async fn handshake(
    stream: TcpStream,
    server_name: ServerName<'static>,
    provider: &Arc<CryptoProvider>,
    deadline: Instant,
) -> Handshake {
    let capture = Arc::new(ChainCapture::new(provider));
    let config = match client_config(provider, Arc::clone(&capture)) {
        Ok(config) => config,
        Err(e) => {
            return Handshake {
                presented: Vec::new(),
                outcome: Err(e),
            }
        }
    };

    let connector = TlsConnector::from(Arc::new(config));
    let outcome =
        match tokio::time::timeout_at(deadline, connector.connect(server_name, stream)).await {
            Ok(Ok(tls_stream)) => Ok(tls_stream),
            Ok(Err(e)) => Err(ProbeError::Handshake(e)),
            Err(_) => Err(ProbeError::HandshakeTimeout),
        };

    Handshake {
        presented: capture.take(),
        outcome,
    }
}

/// Formats a negotiated protocol version the way reports show it (`"1.2"`, `"1.3"`).
pub fn tls_version_label(version: ProtocolVersion) -> String {
    match version {
        ProtocolVersion::TLSv1_0 => "1.0".to_string(),
        ProtocolVersion::TLSv1_1 => "1.1".to_string(),
        ProtocolVersion::TLSv1_2 => "1.2".to_string(),
        ProtocolVersion::TLSv1_3 => "1.3".to_string(),
        other => format!("{other:?}"),
    }
}
