use crate::attributes::{AWS_LOG_GROUP_NAMES, AWS_LOG_STREAM_NAMES};
use crate::builder::OtlpRequestBuilder;
use crate::env::{
    env_or, env_parse_or, CW_OTLP_DEFAULT_MANIFEST_VERSION_ENV,
    CW_OTLP_MAX_ENTRIES_PER_DOCUMENT_ENV,
};
use crate::event::{KubernetesMetadata, LogEvent};
use crate::identity::parse_host_id;
use crate::sink::LogSink;
use std::error::Error;

/// Dispatcher settings.
///
/// **Fields**
/// - `default_manifest_version`: written for Kubernetes events that carry
///   no manifest version of their own.
/// - `max_entries_per_document`: once a document holds this many entries it
///   stops accepting events and a new one is opened for the same source.
#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    pub default_manifest_version: String,
    pub max_entries_per_document: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            default_manifest_version: String::new(),
            max_entries_per_document: 1000,
        }
    }
}

impl DispatcherConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_manifest_version: env_or(
                CW_OTLP_DEFAULT_MANIFEST_VERSION_ENV,
                &defaults.default_manifest_version,
            ),
            max_entries_per_document: env_parse_or(
                CW_OTLP_MAX_ENTRIES_PER_DOCUMENT_ENV,
                defaults.max_entries_per_document,
            ),
        }
    }
}

/// Error type returned by [`Dispatcher::flush`].
#[derive(thiserror::Error, Debug)]
pub enum DispatchError {
    #[error("sink rejected document after {delivered} delivered, {requeued} requeued: {source}")]
    Sink {
        delivered: usize,
        requeued: usize,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

/// Routes raw events to the builder owning their source identity.
///
/// A document only ever holds events from one log group and log stream, so
/// its resource labels describe every entry. Within that source, events are
/// further split by container (Kubernetes metadata present) or host (host id
/// derivable from the stream name). Documents collect events until they are
/// full or flushed.
#[derive(Debug, Default)]
pub struct Dispatcher {
    config: DispatcherConfig,
    builders: Vec<OtlpRequestBuilder>,
}

impl Dispatcher {
    pub fn new(config: DispatcherConfig) -> Self {
        Self {
            config,
            builders: Vec::new(),
        }
    }

    /// Number of documents currently open.
    pub fn open_documents(&self) -> usize {
        self.builders.len()
    }

    /// Append `event` to the matching document, opening one when none matches.
    pub fn route(&mut self, event: &LogEvent) {
        let max_entries = self.config.max_entries_per_document.max(1);
        let position = self
            .builders
            .iter()
            .position(|builder| builder.entry_count() < max_entries && Self::matches(builder, event));

        let builder = match position {
            Some(index) => &mut self.builders[index],
            None => {
                tracing::debug!(
                    log_group = %event.log_group,
                    log_stream = %event.log_stream,
                    open = self.builders.len(),
                    "opening new document"
                );
                let builder = Self::configure(&self.config, event);
                self.builders.push(builder);
                let last = self.builders.len() - 1;
                &mut self.builders[last]
            }
        };

        builder.add_log_entry(
            &event.event_id,
            event.timestamp_nanos(),
            &event.message,
            event.region.as_deref(),
            std::slice::from_ref(&event.attributes),
        );
    }

    fn matches(builder: &OtlpRequestBuilder, event: &LogEvent) -> bool {
        let same_source = builder.resource_attribute(AWS_LOG_GROUP_NAMES) == Some(event.log_group.as_str())
            && builder.resource_attribute(AWS_LOG_STREAM_NAMES) == Some(event.log_stream.as_str());
        if !same_source {
            return false;
        }
        if let Some(k8s) = &event.kubernetes {
            return builder.match_container_name(&k8s.identity());
        }
        if builder.has_container_name() {
            return false;
        }
        match parse_host_id(&event.log_stream) {
            Some(host_id) => builder.match_host_id(host_id),
            None => !builder.has_host_id(),
        }
    }

    fn configure(config: &DispatcherConfig, event: &LogEvent) -> OtlpRequestBuilder {
        let mut builder = OtlpRequestBuilder::new();
        builder
            .set_log_group(&event.log_group)
            .set_log_stream(&event.log_stream);
        if let Some(account) = event.account.as_deref() {
            builder.set_cloud_account(account);
        }
        if let Some(k8s) = &event.kubernetes {
            Self::configure_kubernetes(&mut builder, k8s, &config.default_manifest_version);
        }
        builder
    }

    fn configure_kubernetes(
        builder: &mut OtlpRequestBuilder,
        k8s: &KubernetesMetadata,
        default_manifest_version: &str,
    ) {
        builder
            .set_kubernetes_cluster_uid(&k8s.cluster_uid)
            .set_kubernetes_namespace_name(&k8s.namespace_name)
            .set_kubernetes_pod_name(&k8s.pod_name)
            .set_kubernetes_pod_uid(&k8s.pod_uid)
            .set_kubernetes_container_name(&k8s.container_name)
            .set_kubernetes_container_image(&k8s.container_image)
            .set_kubernetes_container_id(&k8s.container_id)
            .set_kubernetes_node_name(&k8s.node_name)
            .set_kubernetes_pod_labels(&k8s.labels)
            .set_kubernetes_pod_annotations(&k8s.annotations)
            .set_kubernetes_manifest_version(&k8s.manifest_version, default_manifest_version)
            .set_otel_attributes(&k8s.pod_name, &k8s.container_name);
    }

    /// Materialize every open document and hand it to `sink`.
    ///
    /// Delivery stops at the first sink error. The rejected document is
    /// dropped; documents not yet attempted stay open for the next flush.
    ///
    /// **Returns**
    /// - `Ok(n)` with the number of documents delivered.
    pub async fn flush(&mut self, sink: &dyn LogSink) -> Result<usize, DispatchError> {
        let mut pending = std::mem::take(&mut self.builders).into_iter();
        let mut delivered = 0;
        let mut failure = None;

        for builder in pending.by_ref() {
            let document = builder.into_logs();
            if let Err(source) = sink.send(&document).await {
                failure = Some(source);
                break;
            }
            delivered += 1;
        }

        if let Some(source) = failure {
            let requeued = pending.len();
            self.builders.extend(pending);
            tracing::error!(
                delivered,
                requeued,
                error = %source,
                "failed to deliver log document"
            );
            return Err(DispatchError::Sink {
                delivered,
                requeued,
                source,
            });
        }

        sink.flush().await.map_err(|source| DispatchError::Sink {
            delivered,
            requeued: 0,
            source,
        })?;

        if delivered > 0 {
            tracing::info!(documents = delivered, "flushed log documents");
        }
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::*;
    use crate::noop_sink::MemorySink;
    use crate::record::{AttributeValue, LogsDocument};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ec2_event(id: &str, stream: &str) -> LogEvent {
        LogEvent {
            event_id: id.to_string(),
            timestamp: 1_000,
            message: format!("message {}", id),
            region: None,
            log_group: "/var/log/messages".to_string(),
            log_stream: stream.to_string(),
            account: Some("123456789012".to_string()),
            kubernetes: None,
            attributes: Default::default(),
        }
    }

    fn k8s_event(id: &str, pod_uid: &str) -> LogEvent {
        let mut event = ec2_event(id, "fluent-bit-us-west-2");
        event.kubernetes = Some(KubernetesMetadata {
            cluster_uid: "c1".into(),
            namespace_name: "ns".into(),
            pod_name: "web-0".into(),
            pod_uid: pod_uid.into(),
            container_name: "nginx".into(),
            ..Default::default()
        });
        event
    }

    #[test]
    fn groups_events_by_host_id() {
        let mut dispatcher = Dispatcher::default();
        dispatcher.route(&ec2_event("1", "i-aaa/messages"));
        dispatcher.route(&ec2_event("2", "i-bbb/messages"));
        dispatcher.route(&ec2_event("3", "i-aaa/messages"));
        assert_eq!(dispatcher.open_documents(), 2);
        assert_eq!(dispatcher.builders[0].entry_count(), 2);
        assert_eq!(dispatcher.builders[0].host_id(), Some("i-aaa"));
    }

    #[test]
    fn same_host_in_different_groups_gets_separate_documents() {
        let mut dispatcher = Dispatcher::default();
        dispatcher.route(&ec2_event("1", "i-aaa/messages"));
        let mut secure = ec2_event("2", "i-aaa/secure");
        secure.log_group = "/var/log/secure".to_string();
        dispatcher.route(&secure);
        dispatcher.route(&ec2_event("3", "i-aaa/secure"));

        assert_eq!(dispatcher.open_documents(), 3);
        for builder in &dispatcher.builders {
            assert_eq!(builder.entry_count(), 1);
            assert_eq!(builder.host_id(), Some("i-aaa"));
        }
        let second = &dispatcher.builders[1];
        assert_eq!(second.resource_attribute(AWS_LOG_GROUP_NAMES), Some("/var/log/secure"));
        assert_eq!(second.resource_attribute(AWS_LOG_STREAM_NAMES), Some("i-aaa/secure"));
    }

    #[test]
    fn container_events_split_by_log_group() {
        let mut dispatcher = Dispatcher::default();
        dispatcher.route(&k8s_event("1", "p1"));
        let mut other_group = k8s_event("2", "p1");
        other_group.log_group = "/aws/containerinsights/other".to_string();
        dispatcher.route(&other_group);
        assert_eq!(dispatcher.open_documents(), 2);
    }

    #[test]
    fn groups_unidentified_events_by_group_and_stream() {
        let mut dispatcher = Dispatcher::default();
        dispatcher.route(&ec2_event("1", "app"));
        dispatcher.route(&ec2_event("2", "app"));
        dispatcher.route(&ec2_event("3", "worker"));
        assert_eq!(dispatcher.open_documents(), 2);
    }

    #[test]
    fn groups_kubernetes_events_by_container_identity() {
        let mut dispatcher = Dispatcher::new(DispatcherConfig {
            default_manifest_version: "1.2.3".into(),
            ..Default::default()
        });
        dispatcher.route(&k8s_event("1", "p1"));
        dispatcher.route(&k8s_event("2", "p2"));
        dispatcher.route(&k8s_event("3", "p1"));
        dispatcher.route(&ec2_event("4", "fluent-bit-us-west-2"));
        assert_eq!(dispatcher.open_documents(), 3);

        let first = &dispatcher.builders[0];
        assert_eq!(first.entry_count(), 2);
        assert_eq!(first.resource_attribute(K8S_MANIFEST_VERSION), Some("1.2.3"));
        assert_eq!(first.resource_attribute(HOST_NAME), Some("web-0"));
        assert_eq!(first.resource_attribute(SERVICE_NAME), Some("nginx"));
    }

    #[test]
    fn full_documents_stop_accepting_events() {
        let mut dispatcher = Dispatcher::new(DispatcherConfig {
            max_entries_per_document: 2,
            ..Default::default()
        });
        for i in 0..5 {
            dispatcher.route(&ec2_event(&i.to_string(), "i-aaa"));
        }
        assert_eq!(dispatcher.open_documents(), 3);
    }

    #[tokio::test]
    async fn flush_hands_over_every_document() {
        let mut dispatcher = Dispatcher::default();
        dispatcher.route(&ec2_event("1", "i-aaa-us-east-1"));
        dispatcher.route(&ec2_event("2", "i-bbb"));

        let sink = MemorySink::new();
        assert_eq!(dispatcher.flush(&sink).await.unwrap(), 2);
        assert_eq!(dispatcher.open_documents(), 0);

        let docs = sink.take().await;
        assert_eq!(docs.len(), 2);
        let attrs = &docs[0].resource().attributes;
        assert_eq!(attrs.get(CLOUD_PROVIDER).map(String::as_str), Some(CLOUD_PROVIDER_AWS));
        assert_eq!(attrs.get(CLOUD_ACCOUNT_ID).map(String::as_str), Some("123456789012"));
        let entry = &docs[0].entries()[0];
        assert_eq!(entry.time_unix_nano, 1_000_000_000);
        assert_eq!(entry.attribute(CLOUD_REGION), Some(&AttributeValue::Str("us-east-1".into())));
    }

    struct FailingSink;

    #[async_trait]
    impl LogSink for FailingSink {
        async fn send(&self, _document: &LogsDocument) -> Result<(), Box<dyn Error + Send + Sync>> {
            Err("unavailable".into())
        }
    }

    #[tokio::test]
    async fn flush_reports_sink_failure_and_drops_rejected_document() {
        let mut dispatcher = Dispatcher::default();
        dispatcher.route(&ec2_event("1", "i-aaa"));

        let err = dispatcher.flush(&FailingSink).await.unwrap_err();
        assert!(matches!(err, DispatchError::Sink { delivered: 0, requeued: 0, .. }));
        assert_eq!(dispatcher.open_documents(), 0);
    }

    /// Accepts a fixed number of documents, then rejects everything.
    struct FlakySink {
        accept: usize,
        seen: AtomicUsize,
    }

    #[async_trait]
    impl LogSink for FlakySink {
        async fn send(&self, _document: &LogsDocument) -> Result<(), Box<dyn Error + Send + Sync>> {
            if self.seen.fetch_add(1, Ordering::SeqCst) < self.accept {
                Ok(())
            } else {
                Err("unavailable".into())
            }
        }
    }

    #[tokio::test]
    async fn flush_keeps_untried_documents_open_after_failure() {
        let mut dispatcher = Dispatcher::default();
        dispatcher.route(&ec2_event("1", "i-aaa"));
        dispatcher.route(&ec2_event("2", "i-bbb"));
        dispatcher.route(&ec2_event("3", "i-ccc"));

        let sink = FlakySink {
            accept: 1,
            seen: AtomicUsize::new(0),
        };
        let err = dispatcher.flush(&sink).await.unwrap_err();
        assert!(matches!(err, DispatchError::Sink { delivered: 1, requeued: 1, .. }));
        assert_eq!(dispatcher.open_documents(), 1);
        assert_eq!(dispatcher.builders[0].host_id(), Some("i-ccc"));

        let memory = MemorySink::new();
        assert_eq!(dispatcher.flush(&memory).await.unwrap(), 1);
        assert_eq!(memory.take().await[0].entries()[0].event_name, "3");
    }
}
