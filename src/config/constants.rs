//! Configuration constants.
//!
//! Defaults for the run configuration and fixed operational parameters.

use std::time::Duration;

/// TCP port probed on every host.
pub const DEFAULT_PORT: u16 = 443;

/// Per-connection deadline covering resolution, TCP connect and TLS handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

/// Default size of the worker pool.
pub const DEFAULT_PARALLELISM: usize = 20;

/// Work queue slots per worker. The queue is bounded at `parallelism * QUEUE_DEPTH_PER_WORKER`.
pub const QUEUE_DEPTH_PER_WORKER: usize = 4;

/// Number of attempts the system resolver makes per lookup.
pub const DNS_ATTEMPTS: usize = 2;

/// Seconds between progress log lines emitted by the aggregator.
pub const LOGGING_INTERVAL: usize = 5;

/// Issuer label audited when no `--expect` rule is given.
pub const DEFAULT_ISSUER_LABEL: &str = "R3";

/// Intermediate label expected for [`DEFAULT_ISSUER_LABEL`].
pub const DEFAULT_INTERMEDIATE_LABEL: &str = "R3";

/// Prefix of the default finding file name.
pub const OUTPUT_FILE_PREFIX: &str = "chain-audit-";

/// Feed column holding the reversed hostname in stats-exporter TSV files.
pub const DEFAULT_FEED_COLUMN: usize = 1;
