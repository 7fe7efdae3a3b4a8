//! Certificate chains and the chain consistency check.
//!
//! A server's presented chain is parsed into [`CertificateChain`] (leaf
//! first, unparseable entries dropped) and audited against an
//! [`AuthorityExpectation`] table by [`is_mismatched`].

mod check;
mod expectation;
mod extract;

use std::fmt::Write as _;

use rustls::pki_types::CertificateDer;

pub use check::is_mismatched;
pub use expectation::{AuthorityExpectation, ExpectationRule};

use extract::{issuer_label, subject_label};

/// The labels of one presented certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRecord {
    /// Subject Common Name (empty when the subject has none)
    pub subject: String,
    /// Issuer Common Name (empty when the issuer has none)
    pub issuer: String,
}

impl CertificateRecord {
    /// Creates a record from its subject and issuer labels.
    pub fn new(subject: impl Into<String>, issuer: impl Into<String>) -> Self {
        CertificateRecord {
            subject: subject.into(),
            issuer: issuer.into(),
        }
    }

    /// Parses one DER certificate.
    ///
    /// # Errors
    ///
    /// Returns the parser error when the bytes are not a valid X.509 certificate.
    pub fn from_der(der: &[u8]) -> Result<Self, x509_parser::nom::Err<x509_parser::error::X509Error>> {
        let (_, cert) = x509_parser::parse_x509_certificate(der)?;
        Ok(CertificateRecord {
            subject: subject_label(&cert),
            issuer: issuer_label(&cert),
        })
    }
}

/// A presented certificate chain, leaf first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateChain {
    records: Vec<CertificateRecord>,
}

impl CertificateChain {
    /// Builds a chain from already parsed records.
    pub fn new(records: Vec<CertificateRecord>) -> Self {
        CertificateChain { records }
    }

    /// Parses the raw chain exactly as presented by a peer.
    ///
    /// Entries that fail to parse are dropped and logged; the remaining
    /// entries keep their relative order.
    pub fn from_der(presented: &[CertificateDer<'_>]) -> Self {
        let records = presented
            .iter()
            .enumerate()
            .filter_map(|(position, der)| match CertificateRecord::from_der(der.as_ref()) {
                Ok(record) => Some(record),
                Err(e) => {
                    log::debug!("Dropping unparseable certificate at position {position}: {e}");
                    None
                }
            })
            .collect();
        CertificateChain { records }
    }

    /// The leaf (end-entity) certificate, if any was presented.
    pub fn leaf(&self) -> Option<&CertificateRecord> {
        self.records.first()
    }

    /// Everything after the leaf.
    pub fn intermediates(&self) -> &[CertificateRecord] {
        self.records.get(1..).unwrap_or_default()
    }

    /// Number of parsed certificates.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing parseable was presented.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Renders the chain for debug output.
    ///
    /// Format: `leaf: [subject: A | issuer: B] -> chain0: [subject: B | issuer: C] ...`
    pub fn describe(&self) -> String {
        let Some(leaf) = self.leaf() else {
            return "empty chain".to_string();
        };
        let mut out = format!("leaf: [subject: {} | issuer: {}]", leaf.subject, leaf.issuer);
        for (num, cert) in self.intermediates().iter().enumerate() {
            let _ = write!(
                out,
                " -> chain{num}: [subject: {} | issuer: {}]",
                cert.subject, cert.issuer
            );
        }
        out
    }
}
