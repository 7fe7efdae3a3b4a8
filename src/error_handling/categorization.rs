//! Probe error categorization.

use std::io::ErrorKind;

use super::types::{FailureClass, ProbeError};

/// Categorizes a probe error into the [`FailureClass`] recorded on the result.
///
/// DNS failures win over everything else (a resolver that timed out is still
/// a DNS problem), then deadline expiry and I/O errors of kind `TimedOut`,
/// then everything else.
pub fn categorize_probe_error(error: &ProbeError) -> FailureClass {
    match error {
        ProbeError::Dns(_) | ProbeError::NoAddresses => FailureClass::DnsError,
        ProbeError::ConnectTimeout | ProbeError::HandshakeTimeout => FailureClass::Timeout,
        ProbeError::Connect(e) | ProbeError::Handshake(e) if e.kind() == ErrorKind::TimedOut => {
            FailureClass::Timeout
        }
        ProbeError::Connect(_)
        | ProbeError::Handshake(_)
        | ProbeError::InvalidServerName(_)
        | ProbeError::TlsConfig(_) => FailureClass::OtherNetwork,
    }
}
