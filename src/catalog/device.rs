//! Device and field mapping types

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Identifier of a monitored device
///
/// `rtl_433` reports ids as numbers while catalogs may use strings. The key
/// is the compact JSON text of the id, so the string `"1"` and the number `1`
/// are distinct devices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId(String);

impl DeviceId {
    /// Build an id from a JSON value as it appears in a log entry
    pub fn from_value(value: &Value) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self::from_value(&Value::from(id))
    }
}

impl From<u64> for DeviceId {
    fn from(id: u64) -> Self {
        Self::from_value(&Value::from(id))
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DeviceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::String(_) | Value::Number(_) => Ok(Self::from_value(&value)),
            other => Err(de::Error::custom(format!(
                "device id must be a string or number, got {}",
                other
            ))),
        }
    }
}

/// Mapping of one raw log field onto a canonical telemetry field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldMapping {
    /// Field name as written by `rtl_433` (e.g. `temperature_C`)
    pub logfield: String,
    /// Canonical field name in the snapshot (e.g. `temp`)
    pub newfield: String,
}

/// A monitored device and its ordered field mappings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub telemetry: Vec<FieldMapping>,
}

impl Device {
    /// Create a device from an id and `(logfield, newfield)` pairs
    pub fn new<I: Into<DeviceId>>(id: I, mappings: &[(&str, &str)]) -> Self {
        Self {
            id: id.into(),
            telemetry: mappings
                .iter()
                .map(|(logfield, newfield)| FieldMapping {
                    logfield: logfield.to_string(),
                    newfield: newfield.to_string(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_and_number_ids_differ() {
        assert_ne!(DeviceId::from("1"), DeviceId::from(1u64));
        assert_eq!(DeviceId::from(1u64), DeviceId::from_value(&serde_json::json!(1)));
    }

    #[test]
    fn test_reject_non_scalar_id() {
        let result = serde_json::from_str::<Device>(r#"{ "id": [1], "telemetry": [] }"#);
        assert!(result.is_err());

        let result = serde_json::from_str::<Device>(r#"{ "id": null, "telemetry": [] }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_device_new() {
        let device = Device::new("A1", &[("temperature_C", "temp")]);
        assert_eq!(device.id, DeviceId::from("A1"));
        assert_eq!(
            device.telemetry,
            vec![FieldMapping { logfield: "temperature_C".into(), newfield: "temp".into() }]
        );
    }
}
