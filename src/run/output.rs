//! Finding file naming.

use std::path::PathBuf;

use chrono::Local;

use crate::config::{HostSource, OUTPUT_FILE_PREFIX};

/// Default finding file in the working directory.
///
/// `chain-audit-<feed file name>` when auditing a feed, otherwise
/// `chain-audit-<YYYY-MM-DD>` for today's local date.
pub fn default_output_path(hosts: &HostSource) -> PathBuf {
    let suffix = match hosts {
        HostSource::StatsTsv { path, .. } => path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(today),
        HostSource::List(_) => today(),
    };
    PathBuf::from(format!("{OUTPUT_FILE_PREFIX}{suffix}"))
}

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}
