//! Hostname feed.
//!
//! Turns a [`HostSource`] into the ordered list of hostnames handed to the
//! dispatcher. Stats-exporter feeds store hostnames TLD first
//! (`com.example.www`); they are reversed back to standard form here and
//! wildcard entries are dropped, since they never resolve.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info};
use rand::seq::SliceRandom;

use crate::config::HostSource;
use crate::error_handling::InputError;

/// Reverses the labels of a hostname: `com.example.www` becomes
/// `www.example.com`.
pub fn reverse_hostname(hostname: &str) -> String {
    hostname.split('.').rev().collect::<Vec<_>>().join(".")
}

/// Reads reversed hostnames from column `column` of a tab-delimited feed.
///
/// Rows may have any number of fields; blank entries and entries containing
/// `*` are skipped.
///
/// # Errors
///
/// Returns an [`InputError`] when a row cannot be parsed or lacks `column`.
pub fn parse_stats_tsv<R: Read>(reader: R, column: usize) -> Result<Vec<String>, InputError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut hostnames = Vec::new();
    let mut skipped = 0usize;
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let entry = record
            .get(column)
            .ok_or(InputError::MissingColumn {
                row: index as u64 + 1,
                column,
            })?
            .trim();
        if entry.is_empty() || entry.contains('*') {
            skipped += 1;
            continue;
        }
        hostnames.push(reverse_hostname(entry));
    }
    debug!("Skipped {skipped} blank or wildcard feed entries");
    Ok(hostnames)
}

/// Opens and parses a stats-exporter TSV feed.
///
/// # Errors
///
/// Returns `InputError::Open` when the file cannot be opened, otherwise see
/// [`parse_stats_tsv`].
pub fn read_stats_tsv(path: &Path, column: usize) -> Result<Vec<String>, InputError> {
    let file = File::open(path).map_err(|source| InputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_stats_tsv(file, column)
}

/// Produces the hostnames of a run.
///
/// # Errors
///
/// Returns an [`InputError`] when the feed cannot be read or yields no
/// hostnames at all.
pub fn load_hostnames(source: &HostSource) -> Result<Vec<String>, InputError> {
    let hostnames = match source {
        HostSource::StatsTsv { path, column } => read_stats_tsv(path, *column)?,
        HostSource::List(hostnames) => hostnames
            .iter()
            .map(|h| h.trim())
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .collect(),
    };
    if hostnames.is_empty() {
        return Err(InputError::NoHostnames);
    }
    info!("Loaded {} hostnames", hostnames.len());
    Ok(hostnames)
}

/// Shuffles hostnames in place so adjacent names are not probed together.
pub fn shuffle_hostnames(hostnames: &mut [String]) {
    hostnames.shuffle(&mut rand::rng());
}
