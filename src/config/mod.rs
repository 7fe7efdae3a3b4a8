//! Run configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, pool sizing, logging cadence)
//! - The library-level [`Config`] value threaded through the run
//! - CLI option parsing ([`Opt`]) for the binary

mod cli;
mod constants;
mod types;

// Re-export all constants
pub use cli::Opt;
pub use constants::*;
pub use types::{Config, HostSource, LogFormat, LogLevel};
