// Metric record types shared by the collectors and the sink

use serde::Serialize;
use std::collections::BTreeMap;

/// Kind of measurement a record carries. Everything this daemon emits is an
/// instantaneous snapshot, so only `Gauge` exists for now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Gauge,
}

/// One field value. Untagged so JSON-lines output reads `"total": 100`
/// rather than `"total": {"uint": 100}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Uint(u64),
    Float(f64),
    Str(String),
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        FieldValue::Uint(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Str(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

/// One emitted measurement: a name plus tag and field maps. Built once by a
/// collector, then moved into the sink; never mutated after that.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRecord {
    pub kind: RecordKind,
    pub measurement: String,
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, FieldValue>,
}

impl MetricRecord {
    pub fn gauge(
        measurement: &str,
        fields: BTreeMap<String, FieldValue>,
        tags: BTreeMap<String, String>,
    ) -> Self {
        Self {
            kind: RecordKind::Gauge,
            measurement: measurement.to_string(),
            tags,
            fields,
        }
    }
}
