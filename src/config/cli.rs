//! Command-line options.
//!
//! `Opt` is generated by `clap` from the field attributes and converted into
//! the library [`Config`] with [`Opt::into_config`].

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use super::constants::{
    DEFAULT_FEED_COLUMN, DEFAULT_INTERMEDIATE_LABEL, DEFAULT_ISSUER_LABEL, DEFAULT_PARALLELISM,
    DEFAULT_PORT,
};
use super::types::{Config, HostSource, LogFormat, LogLevel};
use crate::chain::ExpectationRule;
use crate::error_handling::ConfigError;

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Audit a stats-exporter feed with 64 workers
/// chain_auditor --stats-tsv-file hostnames.tsv --parallelism 64
///
/// # Audit two hosts against two authorities
/// chain_auditor --expect R3=R3 --expect "Let's Encrypt Authority X3=Let's Encrypt Authority X3" \
///     example.com example.org
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "chain_auditor",
    about = "Finds TLS servers presenting the wrong intermediate certificate for their issuer."
)]
pub struct Opt {
    /// Hostnames to audit (ignored when --stats-tsv-file is given)
    #[arg(value_name = "HOSTNAME")]
    pub hostnames: Vec<String>,

    /// Path to tab separated value file produced by stats-exporter
    #[arg(long, value_parser)]
    pub stats_tsv_file: Option<PathBuf>,

    /// Zero-based feed column holding the reversed hostname
    #[arg(long, default_value_t = DEFAULT_FEED_COLUMN)]
    pub column: usize,

    /// Number of concurrent audit workers
    #[arg(long, default_value_t = DEFAULT_PARALLELISM)]
    pub parallelism: usize,

    /// Per-connection timeout in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub timeout_ms: u64,

    /// TCP port to probe
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Issuer label and the intermediate label it must be served with, as ISSUER=INTERMEDIATE.
    ///
    /// Repeat to audit several authorities; repeating an issuer adds another
    /// acceptable intermediate.
    #[arg(long = "expect", value_name = "ISSUER=INTERMEDIATE")]
    pub expectations: Vec<ExpectationRule>,

    /// File receiving one line per mismatched host (default: chain-audit-<feed or date>)
    #[arg(long, value_parser)]
    pub output: Option<PathBuf>,

    /// Keep the input order instead of shuffling hostnames
    #[arg(long)]
    pub no_shuffle: bool,

    /// Print full audit output for every hostname with a mismatched intermediate
    #[arg(long = "debug", short = 'v')]
    pub verbose: bool,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Opt {
    /// Converts parsed flags into a validated run configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when neither a feed file nor hostnames were
    /// given, or when [`Config::validate`] rejects the values.
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let hosts = match self.stats_tsv_file {
            Some(path) => HostSource::StatsTsv {
                path,
                column: self.column,
            },
            None if !self.hostnames.is_empty() => HostSource::List(self.hostnames),
            None => return Err(ConfigError::NoHostSource),
        };

        let expectations = if self.expectations.is_empty() {
            vec![ExpectationRule::new(
                DEFAULT_ISSUER_LABEL,
                DEFAULT_INTERMEDIATE_LABEL,
            )]
        } else {
            self.expectations
        };

        let config = Config {
            hosts,
            output: self.output,
            parallelism: self.parallelism,
            timeout: Duration::from_millis(self.timeout_ms),
            port: self.port,
            verbose: self.verbose,
            expectations,
            shuffle: !self.no_shuffle,
            log_level: self.log_level,
            log_format: self.log_format,
        };
        config.validate()?;
        Ok(config)
    }
}
