//! Error handling and failure classification.
//!
//! This module provides:
//! - Error type definitions for every layer (initialization, configuration,
//!   hostname feed, output sink, per-host probes)
//! - The [`FailureClass`] recorded on unreachable audit results
//! - Classification of probe errors into failure classes
//!
//! Per-host errors never abort a run: they become a classified
//! `AuditResult`. Only feed and sink failures are fatal.

mod categorization;
mod types;

// Re-export public API
pub use categorization::categorize_probe_error;
pub use types::{
    ConfigError, FailureClass, InitializationError, InputError, ProbeError, SinkError,
};
