use serde::Deserialize;
use std::collections::BTreeMap;

use crate::identity::ContainerIdentity;
use crate::record::RawAttributes;

/// Workload metadata resolved for a container whose output lands in CloudWatch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KubernetesMetadata {
    pub cluster_uid: String,
    pub namespace_name: String,
    pub pod_name: String,
    pub pod_uid: String,
    pub container_name: String,
    pub container_image: String,
    pub container_id: String,
    pub node_name: String,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
    pub manifest_version: String,
}

impl KubernetesMetadata {
    pub fn identity(&self) -> ContainerIdentity {
        ContainerIdentity::new(
            self.cluster_uid.as_str(),
            self.namespace_name.as_str(),
            self.pod_uid.as_str(),
            self.container_name.as_str(),
        )
    }
}

/// One raw CloudWatch log event plus the context it was read from.
#[derive(Debug, Clone, Deserialize)]
pub struct LogEvent {
    pub event_id: String,
    /// Milliseconds since the Unix epoch, as CloudWatch reports it.
    pub timestamp: i64,
    pub message: String,
    #[serde(default)]
    pub region: Option<String>,
    pub log_group: String,
    pub log_stream: String,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub kubernetes: Option<KubernetesMetadata>,
    #[serde(default)]
    pub attributes: RawAttributes,
}

impl LogEvent {
    /// Decode a single event from its JSON representation.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Event time in nanoseconds; saturates instead of overflowing.
    pub fn timestamp_nanos(&self) -> i64 {
        self.timestamp.saturating_mul(1_000_000)
    }
}
