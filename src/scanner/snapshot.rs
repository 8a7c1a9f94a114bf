//! Telemetry snapshot and its baseline fields

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Canonical fields every snapshot starts with
pub const DEFAULT_BASELINE_FIELDS: &[&str] = &["temp", "humid", "wind"];

/// Fixed set of canonical fields pre-seeded into each snapshot
///
/// Each field starts as the empty string, meaning "not observed in this scan".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Baseline {
    fields: Vec<String>,
}

impl Baseline {
    /// Create a baseline from canonical field names
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a fresh snapshot holding every baseline field with an empty value
    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            values: self
                .fields
                .iter()
                .map(|field| (field.clone(), String::new()))
                .collect(),
        }
    }
}

impl Default for Baseline {
    fn default() -> Self {
        Self::new(DEFAULT_BASELINE_FIELDS.iter().copied())
    }
}

/// Latest known value per canonical telemetry field
///
/// Serializes as a flat JSON object, e.g. `{"humid":"","temp":"22.0","wind":""}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TelemetrySnapshot {
    values: BTreeMap<String, String>,
}

impl TelemetrySnapshot {
    /// Value of a canonical field, if present
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Record an observed log value under a canonical field
    ///
    /// Strings are stored verbatim; any other JSON value is stored as its
    /// compact JSON text (`21.5` becomes `"21.5"`).
    pub fn record(&mut self, field: &str, value: &Value) {
        let text = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        self.values.insert(field.to_string(), text);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
