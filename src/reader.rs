//! # RTL433 Reader
//!
//! Query entry point: loads the device catalog, scans the log backward for
//! each device's newest entry, and trims the log when enabled.
//!
//! Each query is all-or-nothing. On failure no snapshot is returned and the
//! log is not trimmed. Queries against the same log must not overlap.

use std::path::PathBuf;
use tracing::debug;

use crate::catalog::{DeviceCatalog, DeviceSource};
use crate::error::Result;
use crate::scanner::{Baseline, TelemetryScanner, TelemetrySnapshot};
use crate::trimmer::LogTrimmer;

/// Reads the latest telemetry for the catalogued devices from an `rtl_433` log
#[derive(Debug, Clone)]
pub struct RtlReader<S = DeviceCatalog> {
    log_path: PathBuf,
    trim: bool,
    source: S,
    scanner: TelemetryScanner,
}

impl RtlReader<DeviceCatalog> {
    /// Create a reader for `log_path`, trimming the log after each query if
    /// `trim` is set
    ///
    /// Uses the default catalog (`DeviceList.json`) and baseline fields.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rtl433_reader::reader::RtlReader;
    ///
    /// let reader = RtlReader::new("rtl_433.json", true);
    /// let snapshot = reader.get_telemetry()?;
    /// println!("temp = {:?}", snapshot.get("temp"));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new<P: Into<PathBuf>>(log_path: P, trim: bool) -> Self {
        Self {
            log_path: log_path.into(),
            trim,
            source: DeviceCatalog::default(),
            scanner: TelemetryScanner::default(),
        }
    }

    /// Load devices from the catalog file at `path`
    pub fn with_catalog_path<P: Into<PathBuf>>(self, path: P) -> Self {
        self.with_source(DeviceCatalog::new(path))
    }
}

impl<S: DeviceSource> RtlReader<S> {
    /// Replace the device source
    pub fn with_source<T: DeviceSource>(self, source: T) -> RtlReader<T> {
        RtlReader {
            log_path: self.log_path,
            trim: self.trim,
            source,
            scanner: self.scanner,
        }
    }

    /// Replace the canonical fields every snapshot starts with
    pub fn with_baseline(mut self, baseline: Baseline) -> Self {
        self.scanner = TelemetryScanner::new(baseline);
        self
    }

    /// Run one query and return a fresh snapshot
    ///
    /// # Errors
    ///
    /// Propagates any catalog, log, parse, or trim failure.
    pub fn get_telemetry(&self) -> Result<TelemetrySnapshot> {
        let devices = self.source.load()?;
        let outcome = self.scanner.scan(&self.log_path, devices)?;

        if self.trim {
            LogTrimmer::new(&self.log_path).trim(outcome.boundary, &outcome.log)?;
        } else {
            debug!("Trimming disabled, boundary {} ignored", outcome.boundary.index());
        }

        Ok(outcome.snapshot)
    }
}
