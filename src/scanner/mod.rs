//! # Telemetry Scanner Module
//!
//! Backward scan of an `rtl_433` JSON log against a device catalog.
//!
//! This module handles:
//! - Reading the whole log into memory as ordered lines
//! - Walking the lines from newest to oldest until every device is resolved
//! - Remapping each device's raw log fields onto canonical snapshot fields
//! - Computing the truncation boundary used by the log trimmer
//!
//! A device is resolved by its newest entry only; older entries for it are
//! never inspected. Line 0 is eligible for matching, and a log exhausted
//! without resolving every device yields boundary 0.
//!
//! A malformed line stops the scan with [`ReaderError::EntryParse`]. A corrupt
//! line therefore blocks resolving any device whose newest entry is older than
//! it, on every query, until the log is trimmed past it.

pub mod snapshot;

pub use snapshot::{Baseline, TelemetrySnapshot, DEFAULT_BASELINE_FIELDS};

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, trace};

use crate::catalog::{Device, DeviceId};
use crate::error::{ReaderError, Result};

/// Raw lines of the telemetry log, oldest first, terminators stripped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogContents {
    lines: Vec<String>,
}

impl LogContents {
    /// Read the whole log file
    ///
    /// # Errors
    ///
    /// Returns [`ReaderError::LogUnavailable`] if the file cannot be read.
    pub fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ReaderError::LogUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_lines(contents.lines()))
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Index of the oldest log line visited before the scan stopped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScanBoundary(pub usize);

impl ScanBoundary {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Result of one backward scan
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub snapshot: TelemetrySnapshot,
    pub boundary: ScanBoundary,
    /// Lines read from the log, kept for trimming
    pub log: LogContents,
}

/// Backward scanner seeded with a baseline of canonical fields
#[derive(Debug, Clone, Default)]
pub struct TelemetryScanner {
    baseline: Baseline,
}

impl TelemetryScanner {
    pub fn new(baseline: Baseline) -> Self {
        Self { baseline }
    }

    /// Read the log at `log_path` and scan it for `devices`
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The log cannot be read ([`ReaderError::LogUnavailable`])
    /// - A visited line is not valid JSON ([`ReaderError::EntryParse`])
    /// - A visited entry lacks `id` or a mapped field ([`ReaderError::MissingField`])
    pub fn scan(&self, log_path: &Path, devices: Vec<Device>) -> Result<ScanOutcome> {
        let log = LogContents::read(log_path)?;
        let (snapshot, boundary) = self.scan_lines(&log, devices)?;
        Ok(ScanOutcome { snapshot, boundary, log })
    }

    /// Scan in-memory log lines for `devices`
    ///
    /// Duplicate device ids keep the last registered device.
    pub fn scan_lines(
        &self,
        log: &LogContents,
        devices: Vec<Device>,
    ) -> Result<(TelemetrySnapshot, ScanBoundary)> {
        let mut pending: HashMap<DeviceId, Device> = devices
            .into_iter()
            .map(|device| (device.id.clone(), device))
            .collect();
        let mut snapshot = self.baseline.snapshot();
        let mut boundary = ScanBoundary::default();

        info!("Checking {} devices against {} log entries", pending.len(), log.len());

        for (index, line) in log.lines().iter().enumerate().rev() {
            if pending.is_empty() {
                break;
            }
            boundary = ScanBoundary(index);

            let entry: Value = serde_json::from_str(line)
                .map_err(|source| ReaderError::EntryParse { index, source })?;
            trace!("Entry {}: {}", index, entry);

            let id = entry.get("id").ok_or_else(|| ReaderError::MissingField {
                index,
                field: "id".to_string(),
            })?;

            if let Some(device) = pending.remove(&DeviceId::from_value(id)) {
                for mapping in &device.telemetry {
                    let value = entry.get(&mapping.logfield).ok_or_else(|| {
                        ReaderError::MissingField {
                            index,
                            field: mapping.logfield.clone(),
                        }
                    })?;
                    snapshot.record(&mapping.newfield, value);
                }
                debug!("Matched device {} at index {}", device.id, index);
            }
        }

        if !pending.is_empty() {
            debug!("Log exhausted with {} devices unresolved", pending.len());
        }

        Ok((snapshot, boundary))
    }
}
