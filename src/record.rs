use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::attributes::SCHEMA_URL;

/// Entry attribute map as supplied by callers. Values of any JSON type are
/// accepted; only strings and integers survive the merge into a [`LogEntry`].
pub type RawAttributes = BTreeMap<String, serde_json::Value>;

/// Scalar value stored in a [`LogEntry`] attribute set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Str(String),
    Int(i64),
}

impl AttributeValue {
    /// Convert a raw JSON value, returning `None` for unsupported types.
    ///
    /// Booleans, floats, nulls, arrays, objects and integers outside the
    /// `i64` range are not representable and are dropped by the caller.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(AttributeValue::Str(s.clone())),
            serde_json::Value::Number(n) => n.as_i64().map(AttributeValue::Int),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Str(s) => Some(s),
            AttributeValue::Int(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(i) => Some(*i),
            AttributeValue::Str(_) => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Str(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Str(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

/// Identity and environment attributes shared by every entry of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resource {
    pub attributes: BTreeMap<String, String>,
}

/// A single log record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub event_name: String,
    /// Nanoseconds since the Unix epoch.
    pub time_unix_nano: i64,
    pub body: String,
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl LogEntry {
    pub fn time(&self) -> DateTime<Utc> {
        Utc.timestamp_nanos(self.time_unix_nano)
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeLogs {
    pub log_records: Vec<LogEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceLogs {
    pub resource: Resource,
    pub schema_url: String,
    /// Created on the first appended entry and never replaced afterwards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_logs: Option<ScopeLogs>,
}

/// Resource + scope + entries tree produced for one source identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsDocument {
    pub resource_logs: ResourceLogs,
}

impl LogsDocument {
    pub fn new() -> Self {
        LogsDocument {
            resource_logs: ResourceLogs {
                resource: Resource::default(),
                schema_url: SCHEMA_URL.to_string(),
                scope_logs: None,
            },
        }
    }

    pub fn resource(&self) -> &Resource {
        &self.resource_logs.resource
    }

    /// Log entries in insertion order; empty when nothing was appended.
    pub fn entries(&self) -> &[LogEntry] {
        self.resource_logs
            .scope_logs
            .as_ref()
            .map(|scope| scope.log_records.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for LogsDocument {
    fn default() -> Self {
        Self::new()
    }
}
