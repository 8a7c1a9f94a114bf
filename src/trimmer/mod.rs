//! # Log Trimmer Module
//!
//! Compacts the telemetry log down to the lines still needed by the next scan.
//!
//! The retained lines are written to a temporary file next to the log and
//! renamed over it once fully flushed. A failure at any step leaves the
//! original log untouched. The replacement takes the original file's
//! permissions, but not its owner.
//!
//! The rename gives the log a new inode. A capture process that keeps the log
//! open (e.g. `rtl_433 -F json:<path>`) goes on appending to the old, unlinked
//! file, so it must reopen the log after each trim.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{ReaderError, Result};
use crate::scanner::{LogContents, ScanBoundary};

/// Rewrites a telemetry log from a scan boundary onward
#[derive(Debug, Clone)]
pub struct LogTrimmer {
    path: PathBuf,
}

impl LogTrimmer {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Keep lines `boundary..` of `log`, discarding everything older
    ///
    /// Boundary 0 retains every line, so the file is left as is.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - `boundary` exceeds the number of lines ([`ReaderError::InvalidBoundary`])
    /// - The replacement file cannot be written or renamed
    ///   ([`ReaderError::LogUnavailable`])
    pub fn trim(&self, boundary: ScanBoundary, log: &LogContents) -> Result<()> {
        let start = boundary.index();
        if start > log.len() {
            return Err(ReaderError::InvalidBoundary {
                boundary: start,
                len: log.len(),
            });
        }

        if start == 0 {
            debug!("Nothing to trim from {}", self.path.display());
            return Ok(());
        }

        let retained = &log.lines()[start..];
        self.replace_with(retained).map_err(|source| ReaderError::LogUnavailable {
            path: self.path.clone(),
            source,
        })?;

        info!(
            "Trimmed {}: discarded {} lines, kept {}",
            self.path.display(),
            start,
            retained.len()
        );
        Ok(())
    }

    fn replace_with(&self, lines: &[String]) -> std::io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let permissions = fs::metadata(&self.path)?.permissions();
        let temp_file = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(temp_file.as_file());
            for line in lines {
                writeln!(writer, "{}", line)?;
            }
            writer.flush()?;
        }
        temp_file.as_file().set_permissions(permissions)?;
        temp_file.as_file().sync_all()?;
        temp_file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}
