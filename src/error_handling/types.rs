//! Error type definitions.
//!
//! This module defines all error types and the per-host failure classes used
//! throughout the application.

use std::path::PathBuf;

use log::SetLoggerError;
use serde::Serialize;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::dns::LookupError;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Error types for invalid run configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The worker pool must contain at least one worker.
    #[error("Parallelism must be at least 1")]
    InvalidParallelism,

    /// The per-connection timeout must be non-zero.
    #[error("Timeout must be greater than zero")]
    InvalidTimeout,

    /// No issuer/intermediate rule was configured.
    #[error("At least one expectation rule is required")]
    NoExpectations,

    /// An expectation rule could not be parsed.
    #[error("Invalid expectation rule '{0}': expected ISSUER=INTERMEDIATE")]
    InvalidExpectation(String),

    /// Neither a feed file nor hostnames were supplied.
    #[error("You must supply at least one hostname as an argument or a file using `--stats-tsv-file`")]
    NoHostSource,
}

/// Error types for the hostname feed. All of them abort the run.
#[derive(Error, Debug)]
pub enum InputError {
    /// The feed file could not be opened.
    #[error("Couldn't open the feed file {path}: {source}")]
    Open {
        /// Feed file path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A feed row could not be parsed.
    #[error("Issue parsing entry in feed file: {0}")]
    Parse(#[from] csv::Error),

    /// A feed row does not have the configured hostname column.
    #[error("Feed row {row} has no column {column}")]
    MissingColumn {
        /// One-based row number
        row: u64,
        /// Zero-based column that was requested
        column: usize,
    },

    /// The feed produced no hostnames after filtering.
    #[error("No hostnames to audit")]
    NoHostnames,
}

/// Error types for the output sink.
#[derive(Error, Debug)]
pub enum SinkError {
    /// The finding file could not be created.
    #[error("Couldn't open output file {path}: {source}")]
    Open {
        /// Output file path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Writing a finding or the summary failed.
    #[error("Failed to write to output sink: {0}")]
    Write(#[from] std::io::Error),

    /// The aggregator thread did not finish.
    #[error("Result aggregator stopped unexpectedly: {0}")]
    Aggregator(String),
}

/// Per-host failures while probing. Never fatal to the run.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Name resolution failed or exceeded the deadline.
    #[error("DNS lookup failed: {0}")]
    Dns(#[from] LookupError),

    /// Name resolution succeeded but returned no addresses.
    #[error("DNS lookup returned no addresses")]
    NoAddresses,

    /// The TCP connection was not established before the deadline.
    #[error("TCP connect timed out")]
    ConnectTimeout,

    /// The TCP connection failed.
    #[error("TCP connect failed: {0}")]
    Connect(std::io::Error),

    /// The hostname is not usable as a TLS server name.
    #[error("Invalid server name: {0}")]
    InvalidServerName(String),

    /// The TLS handshake did not complete before the deadline.
    #[error("TLS handshake timed out")]
    HandshakeTimeout,

    /// The TLS handshake failed.
    #[error("TLS handshake failed: {0}")]
    Handshake(std::io::Error),

    /// The TLS client configuration could not be built.
    #[error("TLS configuration error: {0}")]
    TlsConfig(#[from] rustls::Error),
}

/// Classification of why a host was unreachable.
///
/// At most one class is recorded per result; DNS failures take precedence
/// over timeouts, which take precedence over other network failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIterMacro, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureClass {
    /// The host was reachable.
    #[default]
    None,
    /// Name resolution failed.
    DnsError,
    /// Connect or handshake exceeded the per-connection timeout.
    Timeout,
    /// Any other network-level failure.
    OtherNetwork,
}

impl std::fmt::Display for FailureClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FailureClass {
    /// Returns a human-readable string representation of the failure class.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureClass::None => "none",
            FailureClass::DnsError => "DNS error",
            FailureClass::Timeout => "network timeout",
            FailureClass::OtherNetwork => "other network error",
        }
    }
}
