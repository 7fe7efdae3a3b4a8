//! Dispatcher: distributes hostnames across a fixed pool of audit workers.
//!
//! A single feeder pushes every hostname into a bounded queue and then
//! closes it. `parallelism` workers pull from the queue until it is closed
//! and drained, sending one [`AuditResult`] per hostname to the result
//! channel. The pool is joined at a single barrier.

use std::sync::Arc;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{debug, warn};
use tokio::sync::{mpsc, Mutex};

use crate::audit::{probe, AuditResult, ProbeContext};
use crate::config::QUEUE_DEPTH_PER_WORKER;
use crate::dns::HostResolver;

/// Runs the worker pool over `hostnames` and waits for every worker to exit.
///
/// Each hostname is handed to exactly one worker. `results` is dropped by
/// every worker on exit, so the result stream closes once the pool is done.
///
/// # Arguments
///
/// * `hostnames` - Hostnames in dispatch order (already shuffled by the feed)
/// * `ctx` - Shared probe context
/// * `parallelism` - Pool size; the only concurrency control
/// * `results` - Result channel drained by the aggregator
///
/// # Returns
///
/// The number of worker tasks that panicked (zero on a healthy run).
pub async fn dispatch<R: HostResolver>(
    hostnames: Vec<String>,
    ctx: Arc<ProbeContext<R>>,
    parallelism: usize,
    results: mpsc::UnboundedSender<AuditResult>,
) -> usize {
    let parallelism = parallelism.max(1);
    let (queue_tx, queue_rx) = mpsc::channel::<String>(parallelism * QUEUE_DEPTH_PER_WORKER);
    let queue_rx = Arc::new(Mutex::new(queue_rx));

    let feeder = tokio::spawn(async move {
        for hostname in hostnames {
            if queue_tx.send(hostname).await.is_err() {
                warn!("Work queue closed before every hostname was dispatched");
                break;
            }
        }
        // queue_tx drops here, closing the queue
    });

    let mut workers = FuturesUnordered::new();
    for worker_id in 0..parallelism {
        let queue = Arc::clone(&queue_rx);
        let ctx = Arc::clone(&ctx);
        let results = results.clone();
        workers.push(tokio::spawn(async move {
            let mut audited = 0usize;
            loop {
                let next = queue.lock().await.recv().await;
                let Some(hostname) = next else {
                    break;
                };
                let result = probe(hostname, &ctx).await;
                if results.send(result).is_err() {
                    warn!("Result channel closed; worker {worker_id} stopping");
                    break;
                }
                audited += 1;
            }
            debug!("Worker {worker_id} exiting after {audited} hostnames");
        }));
    }
    // Only workers hold the queue and result channel from here on
    drop(queue_rx);
    drop(results);

    let mut panicked = 0usize;
    while let Some(joined) = workers.next().await {
        if let Err(join_error) = joined {
            panicked += 1;
            warn!("Worker task panicked: {:?}", join_error);
        }
    }
    if let Err(join_error) = feeder.await {
        warn!("Feeder task panicked: {:?}", join_error);
    }
    panicked
}
