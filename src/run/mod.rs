//! Orchestrator.
//!
//! Wires the dispatcher, the worker pool and the aggregator together, waits
//! until every worker has exited and the result stream is drained, then
//! writes the summary line through the sink.

mod output;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::task::JoinHandle;

pub use output::default_output_path;

use crate::aggregate::{start_aggregator, FindingSink, LineSink, Tally};
use crate::app::print_final_statistics;
use crate::audit::ProbeContext;
use crate::chain::AuthorityExpectation;
use crate::config::Config;
use crate::dispatch::dispatch;
use crate::dns::HostResolver;
use crate::error_handling::SinkError;
use crate::initialization::{init_resolver, init_tls_provider};
use crate::input::{load_hostnames, shuffle_hostnames};

/// Results of an audit run.
#[derive(Debug, Clone)]
pub struct AuditReport {
    /// Final counts
    pub tally: Tally,
    /// File holding the findings and the summary line
    pub output_path: PathBuf,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

/// Audits `hostnames` with `parallelism` workers and records the outcome in
/// `sink`.
///
/// Returns once every hostname has produced a result and the summary line
/// has been written. The sink is handed back for callers that need it.
///
/// # Errors
///
/// Returns an error when the sink cannot be written or the aggregator task
/// fails. Per-host failures never end up here; they are counted.
pub async fn audit_hostnames<R, S>(
    hostnames: Vec<String>,
    ctx: Arc<ProbeContext<R>>,
    parallelism: usize,
    sink: S,
) -> Result<(Tally, S)>
where
    R: HostResolver,
    S: FindingSink,
{
    let total = hostnames.len();
    info!("Auditing {total} hostnames with {parallelism} workers");

    let (results_tx, aggregator) = start_aggregator(sink, ctx.verbose, total);
    let panicked = dispatch(hostnames, ctx, parallelism, results_tx).await;
    if panicked > 0 {
        warn!("{panicked} worker(s) stopped early; some hostnames were not audited");
    }

    let (tally, mut sink) = join_aggregator(aggregator).await?;
    if tally.processed != total {
        warn!("Processed {} of {} hostnames", tally.processed, total);
    }

    sink.record_summary(&tally).map_err(SinkError::Write)?;
    sink.flush().map_err(SinkError::Write)?;
    Ok((tally, sink))
}

/// Waits for the aggregator, turning a panicked or cancelled task into a sink error.
async fn join_aggregator<S>(
    handle: JoinHandle<Result<(Tally, S), SinkError>>,
) -> Result<(Tally, S), SinkError> {
    handle
        .await
        .map_err(|e| SinkError::Aggregator(e.to_string()))?
}

/// Runs an audit using the system resolver.
///
/// Loads and (optionally) shuffles the hostnames, creates the finding file,
/// audits every host and logs end-of-run statistics.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the feed cannot be
/// read, or the finding file cannot be created or written.
///
/// # Example
///
/// ```no_run
/// use chain_auditor::{run_audit, Config, HostSource};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config {
///     hosts: HostSource::List(vec!["example.com".to_string()]),
///     ..Default::default()
/// };
/// let report = run_audit(config).await?;
/// println!("{}", report.tally);
/// # Ok(())
/// # }
/// ```
pub async fn run_audit(config: Config) -> Result<AuditReport> {
    let resolver = init_resolver(config.timeout);
    run_audit_with_resolver(config, resolver).await
}

/// Same as [`run_audit`] with an explicit resolver.
///
/// # Errors
///
/// See [`run_audit`].
pub async fn run_audit_with_resolver<R: HostResolver>(
    config: Config,
    resolver: Arc<R>,
) -> Result<AuditReport> {
    config.validate().context("Invalid configuration")?;
    let start_time = Instant::now();

    let mut hostnames = load_hostnames(&config.hosts).context("Failed to load hostnames")?;
    if config.shuffle {
        shuffle_hostnames(&mut hostnames);
    }

    let output_path = config
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&config.hosts));
    let sink = LineSink::create(&output_path)?;
    info!("Writing findings to {}", output_path.display());

    let ctx = Arc::new(ProbeContext {
        expectations: Arc::new(AuthorityExpectation::from_rules(&config.expectations)),
        resolver,
        provider: init_tls_provider(),
        timeout: config.timeout,
        port: config.port,
        verbose: config.verbose,
    });

    let (tally, _sink) = audit_hostnames(hostnames, ctx, config.parallelism, sink).await?;

    let elapsed_seconds = start_time.elapsed().as_secs_f64();
    print_final_statistics(&tally, elapsed_seconds);

    Ok(AuditReport {
        tally,
        output_path,
        elapsed_seconds,
    })
}
