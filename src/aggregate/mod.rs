//! Result aggregation.
//!
//! A single aggregator drains the result stream from every worker, owns the
//! [`Tally`], and forwards mismatch findings to a [`FindingSink`]. Nothing
//! else mutates the counts, so no locking is involved.

mod sink;

use std::fmt;
use std::io;
use std::time::{Duration, Instant};

use log::{error, warn};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub use sink::{FindingSink, LineSink};

use crate::app::log_progress;
use crate::audit::AuditResult;
use crate::config::LOGGING_INTERVAL;
use crate::error_handling::{FailureClass, SinkError};

/// Run counters.
///
/// Every counter only ever increases while results are drained; `processed`
/// equals the number of results received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    /// Results received
    pub processed: usize,
    /// Hosts whose chain lacks the expected intermediate
    pub mismatched: usize,
    /// Hosts whose handshake did not complete
    pub unreachable: usize,
    /// Unreachable because of name resolution
    pub dns_error: usize,
    /// Unreachable because the deadline passed
    pub timeout: usize,
    /// Unreachable for any other network reason
    pub other_network: usize,
    /// Hosts that presented a leaf and no intermediate at all
    pub leaf_only: usize,
}

impl Tally {
    /// Folds one result into the counts.
    pub fn record(&mut self, result: &AuditResult) {
        self.processed += 1;
        if result.mismatched {
            self.mismatched += 1;
        }
        if result.is_leaf_only() {
            self.leaf_only += 1;
        }
        if !result.reachable {
            self.unreachable += 1;
            match result.failure_class {
                FailureClass::DnsError => self.dns_error += 1,
                FailureClass::Timeout => self.timeout += 1,
                FailureClass::OtherNetwork => self.other_network += 1,
                FailureClass::None => {}
            }
        }
    }

    /// Count for one failure class. `FailureClass::None` counts reachable hosts.
    pub fn count(&self, class: FailureClass) -> usize {
        match class {
            FailureClass::None => self.processed - self.unreachable,
            FailureClass::DnsError => self.dns_error,
            FailureClass::Timeout => self.timeout,
            FailureClass::OtherNetwork => self.other_network,
        }
    }
}

impl fmt::Display for Tally {
    /// The summary line, without a trailing newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total:{}\tmismatched:{}\tunreachable:{}\terrdns:{}\terrtimeout:{}\terrnetother:{}",
            self.processed,
            self.mismatched,
            self.unreachable,
            self.dns_error,
            self.timeout,
            self.other_network
        )
    }
}

/// Starts the aggregator on a dedicated blocking thread.
///
/// Returns the sender every worker clones, and a handle that resolves once
/// all senders are dropped and the stream is drained. The handle yields the
/// final tally and the sink so the caller can write the summary.
///
/// A sink write failure does not stop draining: every remaining result is
/// still tallied, further findings are skipped, and the handle resolves to
/// `SinkError::Write`.
///
/// # Arguments
///
/// * `sink` - Destination for mismatch findings
/// * `verbose` - Print each mismatched result to stdout as JSON
/// * `total` - Expected number of results, for progress logging only
pub fn start_aggregator<S: FindingSink>(
    mut sink: S,
    verbose: bool,
    total: usize,
) -> (
    mpsc::UnboundedSender<AuditResult>,
    JoinHandle<Result<(Tally, S), SinkError>>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<AuditResult>();

    let handle = tokio::task::spawn_blocking(move || {
        let start = Instant::now();
        let interval = Duration::from_secs(LOGGING_INTERVAL as u64);
        let mut last_log = start;
        let mut tally = Tally::default();
        let mut write_error: Option<io::Error> = None;

        while let Some(result) = rx.blocking_recv() {
            tally.record(&result);

            if result.mismatched {
                if verbose {
                    match serde_json::to_string(&result) {
                        Ok(json) => println!("{json}"),
                        Err(e) => warn!("Failed to encode result for {}: {e}", result.hostname),
                    }
                }
                if write_error.is_none() {
                    if let Err(e) =
                        sink.record_mismatch(&result.hostname, result.peer_ip.as_deref())
                    {
                        error!("Failed to record finding for {}: {e}", result.hostname);
                        write_error = Some(e);
                    }
                }
            }

            if last_log.elapsed() >= interval {
                log_progress(start, tally.processed, total);
                last_log = Instant::now();
            }
        }

        if let Some(e) = write_error {
            return Err(SinkError::Write(e));
        }
        sink.flush()?;
        Ok((tally, sink))
    });

    (tx, handle)
}
