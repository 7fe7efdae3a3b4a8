//! Configuration types.
//!
//! This module defines the run configuration value and the enums used for
//! logging setup. Nothing here depends on the CLI; the binary converts its
//! parsed flags into a [`Config`] (see [`super::Opt`]).

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use crate::chain::ExpectationRule;
use crate::config::constants::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_FEED_COLUMN, DEFAULT_INTERMEDIATE_LABEL,
    DEFAULT_ISSUER_LABEL, DEFAULT_PARALLELISM, DEFAULT_PORT,
};
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Where the hostnames for a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostSource {
    /// Tab-delimited stats-exporter feed with reversed hostnames in `column`.
    StatsTsv {
        /// Feed file path
        path: PathBuf,
        /// Zero-based column holding the reversed hostname
        column: usize,
    },
    /// Hostnames given directly, already in standard form.
    List(Vec<String>),
}

impl HostSource {
    /// Builds a feed source reading the default stats-exporter column.
    pub fn stats_tsv(path: impl Into<PathBuf>) -> Self {
        HostSource::StatsTsv {
            path: path.into(),
            column: DEFAULT_FEED_COLUMN,
        }
    }
}

/// Library configuration (no CLI dependencies).
///
/// One value describes a whole audit run. It is passed to
/// [`crate::run_audit`] and the parts the workers need are threaded down to
/// them explicitly; there is no process-wide state.
///
/// # Examples
///
/// ```no_run
/// use chain_auditor::{Config, HostSource};
///
/// let config = Config {
///     hosts: HostSource::stats_tsv("hostnames.tsv"),
///     parallelism: 64,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Hostname feed
    pub hosts: HostSource,

    /// Finding file; derived from the feed name or the date when `None`
    pub output: Option<PathBuf>,

    /// Number of concurrently running audit workers
    pub parallelism: usize,

    /// Per-connection deadline (resolution, connect and handshake)
    pub timeout: Duration,

    /// TCP port probed on every host
    pub port: u16,

    /// Print every mismatched finding immediately and log full chains
    pub verbose: bool,

    /// Issuer label to expected intermediate label rules
    pub expectations: Vec<ExpectationRule>,

    /// Shuffle hostnames before dispatch
    pub shuffle: bool,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hosts: HostSource::List(Vec::new()),
            output: None,
            parallelism: DEFAULT_PARALLELISM,
            timeout: DEFAULT_CONNECT_TIMEOUT,
            port: DEFAULT_PORT,
            verbose: false,
            expectations: vec![ExpectationRule::new(
                DEFAULT_ISSUER_LABEL,
                DEFAULT_INTERMEDIATE_LABEL,
            )],
            shuffle: true,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Checks the values a run cannot start without.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the worker pool is empty, the timeout is
    /// zero, or no expectation rule is configured.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parallelism == 0 {
            return Err(ConfigError::InvalidParallelism);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.expectations.is_empty() {
            return Err(ConfigError::NoExpectations);
        }
        Ok(())
    }
}
