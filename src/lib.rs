//! chain_auditor library: finds TLS servers presenting the wrong intermediate
//!
//! This library probes a large set of hostnames over TLS, captures the
//! certificate chain each server presents before any trust evaluation, and
//! reports every host whose chain lacks the intermediate certificate its
//! leaf's issuing authority requires (for example a leaf issued by `R3`
//! served without the `R3` intermediate).
//!
//! # Example
//!
//! ```no_run
//! use chain_auditor::{run_audit, Config, ExpectationRule, HostSource};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     hosts: HostSource::stats_tsv("hostnames.tsv"),
//!     parallelism: 64,
//!     expectations: vec![ExpectationRule::new("R3", "R3")],
//!     ..Default::default()
//! };
//!
//! let report = run_audit(config).await?;
//! println!("{}", report.tally);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod aggregate;
mod app;
pub mod audit;
pub mod chain;
pub mod config;
pub mod dispatch;
pub mod dns;
mod error_handling;
pub mod initialization;
pub mod input;
mod run;
mod tls;

// Re-export public API
pub use aggregate::{FindingSink, LineSink, Tally};
pub use audit::{probe, AuditResult, ProbeContext};
pub use chain::{AuthorityExpectation, CertificateChain, CertificateRecord, ExpectationRule};
pub use config::{Config, HostSource, LogFormat, LogLevel};
pub use dns::{HostResolver, LookupError, StaticResolver};
pub use error_handling::{
    categorize_probe_error, ConfigError, FailureClass, InitializationError, InputError,
    ProbeError, SinkError,
};
pub use run::{
    audit_hostnames, default_output_path, run_audit, run_audit_with_resolver, AuditReport,
};
