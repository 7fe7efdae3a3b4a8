//! Output sink for mismatch findings and the final summary.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::Tally;
use crate::error_handling::SinkError;

/// Destination for mismatch findings and the end-of-run summary.
///
/// Owned by the aggregator while results are drained, then handed back to
/// the orchestrator for the summary line.
pub trait FindingSink: Send + 'static {
    /// Records one mismatched host. `peer_ip` is `None` when no TCP
    /// connection was established.
    fn record_mismatch(&mut self, hostname: &str, peer_ip: Option<&str>) -> io::Result<()>;

    /// Records the final tally.
    fn record_summary(&mut self, tally: &Tally) -> io::Result<()>;

    /// Flushes anything buffered.
    fn flush(&mut self) -> io::Result<()>;
}

/// Line-oriented sink: `<hostname>\t<peerIP>\n` per finding, then the
/// summary line.
pub struct LineSink<W: Write> {
    writer: BufWriter<W>,
}

impl LineSink<File> {
    /// Creates (or truncates) the finding file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Open` when the file cannot be created.
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let file = File::create(path).map_err(|source| SinkError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(LineSink::new(file))
    }
}

impl<W: Write> LineSink<W> {
    /// Wraps any writer.
    pub fn new(inner: W) -> Self {
        LineSink {
            writer: BufWriter::new(inner),
        }
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }
}

impl<W: Write + Send + 'static> FindingSink for LineSink<W> {
    fn record_mismatch(&mut self, hostname: &str, peer_ip: Option<&str>) -> io::Result<()> {
        writeln!(self.writer, "{}\t{}", hostname, peer_ip.unwrap_or_default())
    }

    fn record_summary(&mut self, tally: &Tally) -> io::Result<()> {
        writeln!(self.writer, "{tally}")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
