//! # Device Catalog Module
//!
//! Loads the static list of devices of interest and their field mappings.
//!
//! The catalog is a JSON document of the form:
//!
//! ```json
//! {
//!     "devices": [
//!         { "id": "A1", "telemetry": [ { "logfield": "temperature_C", "newfield": "temp" } ] }
//!     ]
//! }
//! ```

pub mod device;

pub use device::{Device, DeviceId, FieldMapping};

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ReaderError, Result};

/// Catalog file looked up in the working directory when none is configured
pub const DEFAULT_CATALOG_PATH: &str = "DeviceList.json";

/// Source of the devices a query should resolve
///
/// Abstracted so the reader can be driven by an in-memory catalog in tests.
#[cfg_attr(test, mockall::automock)]
pub trait DeviceSource {
    /// Load the full device list
    fn load(&self) -> Result<Vec<Device>>;
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    devices: Vec<Device>,
}

/// File-backed device catalog
#[derive(Debug, Clone)]
pub struct DeviceCatalog {
    path: PathBuf,
}

impl DeviceCatalog {
    /// Create a catalog backed by the JSON file at `path`
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing catalog file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse an in-memory catalog document
    ///
    /// # Errors
    ///
    /// Returns [`ReaderError::CatalogFormat`] if the document is not valid JSON,
    /// has no top-level `devices` key, or a device is malformed.
    pub fn parse(contents: &str) -> Result<Vec<Device>> {
        let document: CatalogDocument = serde_json::from_str(contents)?;
        Ok(document.devices)
    }
}

impl Default for DeviceCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_PATH)
    }
}

impl DeviceSource for DeviceCatalog {
    fn load(&self) -> Result<Vec<Device>> {
        let contents = fs::read_to_string(&self.path).map_err(|source| {
            ReaderError::CatalogUnavailable {
                path: self.path.clone(),
                source,
            }
        })?;

        let devices = Self::parse(&contents)?;
        debug!("Loaded {} devices from {}", devices.len(), self.path.display());
        Ok(devices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE_CATALOG: &str = r#"{
        "devices": [
            { "id": "A1", "telemetry": [ { "logfield": "temperature_C", "newfield": "temp" } ] },
            { "id": 4012, "telemetry": [
                { "logfield": "humidity", "newfield": "humid" },
                { "logfield": "wind_avg_km_h", "newfield": "wind" }
            ] }
        ]
    }"#;

    #[test]
    fn test_parse_devices() {
        let devices = DeviceCatalog::parse(SAMPLE_CATALOG).unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].id.to_string(), "\"A1\"");
        assert_eq!(devices[1].id.to_string(), "4012");
        assert_eq!(devices[1].telemetry.len(), 2);
        assert_eq!(devices[1].telemetry[1].logfield, "wind_avg_km_h");
        assert_eq!(devices[1].telemetry[1].newfield, "wind");
    }

    #[test]
    fn test_parse_missing_devices_key() {
        let result = DeviceCatalog::parse(r#"{ "sensors": [] }"#);
        assert!(matches!(result, Err(ReaderError::CatalogFormat(_))));
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = DeviceCatalog::parse("{ \"devices\": [");
        assert!(matches!(result, Err(ReaderError::CatalogFormat(_))));
    }

    #[test]
    fn test_parse_empty_device_list() {
        let devices = DeviceCatalog::parse(r#"{ "devices": [] }"#).unwrap();
        assert!(devices.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(SAMPLE_CATALOG.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let catalog = DeviceCatalog::new(temp_file.path());
        let devices = catalog.load().unwrap();
        assert_eq!(devices.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = DeviceCatalog::new(dir.path().join("missing.json"));
        let result = catalog.load();
        assert!(matches!(result, Err(ReaderError::CatalogUnavailable { .. })));
    }

    #[test]
    fn test_default_path() {
        assert_eq!(DeviceCatalog::default().path(), Path::new("DeviceList.json"));
    }
}
