//! Run reporting helpers.
//!
//! Progress logging while results are drained and end-of-run statistics.

pub mod logging;
pub mod statistics;

// Re-export public API
pub use logging::log_progress;
pub use statistics::print_final_statistics;
