use cloudwatch_otlp_logs::attributes::*;
use cloudwatch_otlp_logs::dispatch::Dispatcher;
use cloudwatch_otlp_logs::event::LogEvent;
use cloudwatch_otlp_logs::noop_sink::MemorySink;
use cloudwatch_otlp_logs::{AttributeValue, ContainerIdentity, OtlpRequestBuilder, RawAttributes};
use serde_json::json;

#[test]
fn builds_ec2_document_end_to_end() {
    let extra: RawAttributes = serde_json::from_value(json!({"k": "v", "n": 5, "b": false})).unwrap();

    let mut builder = OtlpRequestBuilder::new();
    builder
        .set_cloud_account("123456789012")
        .set_log_group("/var/log/messages")
        .set_log_stream("i-0abc123-eu-central-1")
        .add_log_entry("ev1", 1000, "hello", None, &[extra]);

    assert!(builder.match_host_id("i-0abc123-eu-central-1"));
    assert!(!builder.has_container_name());

    let doc = builder.into_logs();
    let attrs = &doc.resource().attributes;
    assert_eq!(attrs.get(CLOUD_PROVIDER).map(String::as_str), Some(CLOUD_PROVIDER_AWS));
    assert_eq!(attrs.get(CLOUD_PLATFORM).map(String::as_str), Some(CLOUD_PLATFORM_AWS_EC2));
    assert_eq!(attrs.get(AWS_LOG_GROUP_NAMES).map(String::as_str), Some("/var/log/messages"));
    assert_eq!(doc.resource_logs.schema_url, SCHEMA_URL);

    let entry = &doc.entries()[0];
    assert_eq!(entry.attribute(CLOUD_REGION), Some(&AttributeValue::Str("eu-central-1".into())));
    assert_eq!(entry.attribute("n"), Some(&AttributeValue::Int(5)));
    assert!(entry.attribute("b").is_none());
}

#[test]
fn container_match_is_exact() {
    let mut builder = OtlpRequestBuilder::new();
    builder
        .set_kubernetes_cluster_uid("c1")
        .set_kubernetes_namespace_name("ns")
        .set_kubernetes_pod_uid("p1")
        .set_kubernetes_container_name("ct");

    assert_eq!(builder.container_identity(), Some(ContainerIdentity::new("c1", "ns", "p1", "ct")));
    assert!(builder.match_container_name(&ContainerIdentity::new("c1", "ns", "p1", "ct")));
    assert!(!builder.match_container_name(&ContainerIdentity::new("c1", "ns", "p1", "other")));
}

#[tokio::test]
async fn dispatches_json_events_to_sink() {
    let lines = [
        r#"{"event_id":"1","timestamp":5,"message":"a","log_group":"g","log_stream":"s","kubernetes":{"cluster_uid":"c1","namespace_name":"ns","pod_uid":"p1","container_name":"ct","manifest_version":"2.0.0"}}"#,
        r#"{"event_id":"2","timestamp":6,"message":"b","log_group":"g","log_stream":"s","kubernetes":{"cluster_uid":"c1","namespace_name":"ns","pod_uid":"p1","container_name":"ct"}}"#,
        r#"{"event_id":"3","timestamp":7,"message":"c","region":"us-west-2","log_group":"g","log_stream":"ip-10-1-2-3"}"#,
    ];

    let mut dispatcher = Dispatcher::default();
    for line in lines {
        dispatcher.route(&LogEvent::from_json(line).unwrap());
    }

    let sink = MemorySink::new();
    assert_eq!(dispatcher.flush(&sink).await.unwrap(), 2);

    let docs = sink.take().await;
    assert_eq!(docs[0].entries().len(), 2);
    assert_eq!(
        docs[0].resource().attributes.get(K8S_MANIFEST_VERSION).map(String::as_str),
        Some("2.0.0")
    );
    assert_eq!(docs[1].resource().attributes.get(HOST_ID).map(String::as_str), Some("ip-10-1-2-3"));
    assert_eq!(
        docs[1].entries()[0].attribute(CLOUD_REGION),
        Some(&AttributeValue::Str("us-west-2".into()))
    );
}
