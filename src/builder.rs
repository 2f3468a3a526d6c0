use std::collections::BTreeMap;

use crate::attributes::*;
use crate::identity::{parse_host_id, parse_region, ContainerIdentity};
use crate::record::{AttributeValue, LogEntry, LogsDocument, RawAttributes, ScopeLogs};

/// Incrementally assembles one [`LogsDocument`] for a single log source.
///
/// Setters write resource attributes and return the builder so calls can be
/// chained. Entries are appended with [`add_log_entry`](Self::add_log_entry).
/// The predicates (`match_*` / `has_*`) let a dispatcher decide whether a new
/// event belongs to this document.
///
/// A builder is not synchronized; callers serialize access to one instance.
#[derive(Debug, Clone, Default)]
pub struct OtlpRequestBuilder {
    logs: LogsDocument,
    host_id: String,
    parsed_host_id: Option<String>,
    parsed_region: Option<String>,
}

impl OtlpRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn attrs(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.logs.resource_logs.resource.attributes
    }

    fn put(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.attrs().insert(key.to_string(), value.into());
        self
    }

    /// Set or clear the host id.
    ///
    /// A non-empty value writes `host.id` together with the `aws_ec2` cloud
    /// platform; an empty value removes both. Every host id write goes
    /// through here so the pair never drifts apart.
    pub fn set_host_id(&mut self, host_id: &str) -> &mut Self {
        self.host_id = host_id.to_string();
        if host_id.is_empty() {
            let attrs = self.attrs();
            attrs.remove(HOST_ID);
            attrs.remove(CLOUD_PLATFORM);
            self
        } else {
            self.put(HOST_ID, host_id)
                .put(CLOUD_PLATFORM, CLOUD_PLATFORM_AWS_EC2)
        }
    }

    pub fn set_cloud_account(&mut self, account: &str) -> &mut Self {
        self.put(CLOUD_ACCOUNT_ID, account)
    }

    pub fn set_log_group(&mut self, log_group: &str) -> &mut Self {
        self.put(AWS_LOG_GROUP_NAMES, log_group)
    }

    /// Record the log stream and derive fallback host id / region from its name.
    ///
    /// The parsed host id is applied only when no host id is set at call
    /// time: an explicit host id set earlier is kept, one set later wins.
    pub fn set_log_stream(&mut self, log_stream: &str) -> &mut Self {
        self.put(AWS_LOG_STREAM_NAMES, log_stream);
        self.parsed_host_id = parse_host_id(log_stream).map(str::to_string);
        self.parsed_region = parse_region(log_stream).map(str::to_string);

        if let Some(parsed) = self.parsed_host_id.clone() {
            if !self.has_host_id() {
                tracing::debug!(log_stream, host_id = %parsed, "host id derived from log stream");
                self.set_host_id(&parsed);
            }
        }
        self
    }

    pub fn set_kubernetes_pod_name(&mut self, pod_name: &str) -> &mut Self {
        self.put(K8S_POD_NAME, pod_name)
    }

    pub fn set_kubernetes_namespace_name(&mut self, namespace_name: &str) -> &mut Self {
        self.put(K8S_NAMESPACE_NAME, namespace_name)
    }

    pub fn set_kubernetes_cluster_uid(&mut self, cluster_uid: &str) -> &mut Self {
        self.put(K8S_CLUSTER_UID, cluster_uid)
    }

    pub fn set_kubernetes_container_name(&mut self, container_name: &str) -> &mut Self {
        self.put(K8S_CONTAINER_NAME, container_name)
    }

    pub fn set_kubernetes_container_image(&mut self, container_image: &str) -> &mut Self {
        self.put(K8S_CONTAINER_IMAGE_NAME, container_image)
    }

    pub fn set_kubernetes_pod_uid(&mut self, pod_uid: &str) -> &mut Self {
        self.put(K8S_POD_UID, pod_uid)
    }

    pub fn set_kubernetes_container_id(&mut self, container_id: &str) -> &mut Self {
        self.put(CONTAINER_ID, container_id)
    }

    pub fn set_kubernetes_node_name(&mut self, node_name: &str) -> &mut Self {
        self.put(K8S_NODE_NAME, node_name)
    }

    /// Write one `k8s.pod.labels.<key>` attribute per label. Keys are not normalized.
    pub fn set_kubernetes_pod_labels<I, K, V>(&mut self, labels: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.put_prefixed(K8S_POD_LABELS_PREFIX, labels)
    }

    /// Write one `k8s.pod.annotations.<key>` attribute per annotation.
    pub fn set_kubernetes_pod_annotations<I, K, V>(&mut self, annotations: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.put_prefixed(K8S_POD_ANNOTATIONS_PREFIX, annotations)
    }

    fn put_prefixed<I, K, V>(&mut self, prefix: &str, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let attrs = self.attrs();
        for (key, value) in entries {
            attrs.insert(format!("{}{}", prefix, key.as_ref()), value.as_ref().to_string());
        }
        self
    }

    /// Write the manifest version, or `default_version` when it is empty.
    ///
    /// The key is always written, even when both are empty.
    pub fn set_kubernetes_manifest_version(
        &mut self,
        manifest_version: &str,
        default_version: &str,
    ) -> &mut Self {
        let version = if manifest_version.is_empty() {
            default_version
        } else {
            manifest_version
        };
        self.put(K8S_MANIFEST_VERSION, version)
    }

    /// Generic naming pair: `host.name` from the pod, `service.name` from the container.
    pub fn set_otel_attributes(&mut self, pod_name: &str, container_name: &str) -> &mut Self {
        self.put(HOST_NAME, pod_name).put(SERVICE_NAME, container_name)
    }

    /// Append one entry to the document's single scope.
    ///
    /// **Parameters**
    /// - `entry_id`: stored as the record's event name.
    /// - `timestamp`: nanoseconds since the Unix epoch.
    /// - `region`: explicit region; when `None` or empty the region parsed
    ///   from the log stream is used, if any.
    /// - `attributes`: merged in order, later maps overwriting earlier keys.
    ///   Only string and integer values are kept.
    pub fn add_log_entry(
        &mut self,
        entry_id: &str,
        timestamp: i64,
        message: &str,
        region: Option<&str>,
        attributes: &[RawAttributes],
    ) -> &mut Self {
        let mut entry = LogEntry {
            event_name: entry_id.to_string(),
            time_unix_nano: timestamp,
            body: message.to_string(),
            attributes: BTreeMap::new(),
        };

        let region = region
            .filter(|r| !r.is_empty())
            .or(self.parsed_region.as_deref());
        if let Some(region) = region {
            entry
                .attributes
                .insert(CLOUD_REGION.to_string(), AttributeValue::from(region));
        }

        for map in attributes {
            for (key, value) in map {
                if let Some(value) = AttributeValue::from_json(value) {
                    entry.attributes.insert(key.clone(), value);
                }
            }
        }

        self.logs
            .resource_logs
            .scope_logs
            .get_or_insert_with(ScopeLogs::default)
            .log_records
            .push(entry);
        self
    }

    pub fn match_host_id(&self, host_id: &str) -> bool {
        self.host_id == host_id
    }

    pub fn has_host_id(&self) -> bool {
        !self.host_id.is_empty()
    }

    pub fn host_id(&self) -> Option<&str> {
        if self.has_host_id() {
            Some(&self.host_id)
        } else {
            None
        }
    }

    /// Current value of a resource attribute.
    pub fn resource_attribute(&self, key: &str) -> Option<&str> {
        self.logs
            .resource_logs
            .resource
            .attributes
            .get(key)
            .map(String::as_str)
    }

    /// Cluster uid, namespace, pod uid and container name, if all four are set.
    pub fn container_identity(&self) -> Option<ContainerIdentity> {
        Some(ContainerIdentity::new(
            self.resource_attribute(K8S_CLUSTER_UID)?,
            self.resource_attribute(K8S_NAMESPACE_NAME)?,
            self.resource_attribute(K8S_POD_UID)?,
            self.resource_attribute(K8S_CONTAINER_NAME)?,
        ))
    }

    pub fn has_container_name(&self) -> bool {
        [K8S_CLUSTER_UID, K8S_NAMESPACE_NAME, K8S_POD_UID, K8S_CONTAINER_NAME]
            .iter()
            .all(|key| self.resource_attribute(key).is_some())
    }

    /// True only when all four identity attributes are set and equal `identity`.
    pub fn match_container_name(&self, identity: &ContainerIdentity) -> bool {
        self.container_identity().as_ref() == Some(identity)
    }

    pub fn entry_count(&self) -> usize {
        self.logs.entries().len()
    }

    /// Materialize the document, stamping the AWS cloud provider.
    ///
    /// The provider is written on every call whether or not a host id was
    /// ever set. Repeated calls return the same document.
    pub fn logs(&mut self) -> &LogsDocument {
        self.put(CLOUD_PROVIDER, CLOUD_PROVIDER_AWS);
        &self.logs
    }

    /// Materialize and hand the document off by value.
    pub fn into_logs(mut self) -> LogsDocument {
        self.put(CLOUD_PROVIDER, CLOUD_PROVIDER_AWS);
        self.logs
    }
}
