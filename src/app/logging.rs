//! Progress logging utilities.

use log::info;
use std::time::Instant;

/// Logs how many hostnames have been audited so far and the current rate.
///
/// # Arguments
///
/// * `start_time` - When the run started
/// * `processed` - Results drained so far
/// * `total` - Hostnames dispatched in this run
pub fn log_progress(start_time: Instant, processed: usize, total: usize) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let rate = if elapsed_secs > 0.0 {
        processed as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Audited {}/{} hostnames in {:.2} seconds (~{:.2} hosts/sec)",
        processed, total, elapsed_secs, rate
    );
}
