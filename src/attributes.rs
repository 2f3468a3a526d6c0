//! Attribute key names written onto the resource and onto log entries.
//!
//! Names follow OpenTelemetry semantic conventions 1.5.0 where a convention
//! exists; the `sw.` keys are vendor-specific and must be reproduced as-is.

/// Schema URL stamped onto every resource.
pub const SCHEMA_URL: &str = "https://opentelemetry.io/schemas/1.5.0";

pub const HOST_ID: &str = "host.id";
pub const HOST_NAME: &str = "host.name";
pub const SERVICE_NAME: &str = "service.name";

pub const CLOUD_ACCOUNT_ID: &str = "cloud.account.id";
pub const CLOUD_PLATFORM: &str = "cloud.platform";
pub const CLOUD_PROVIDER: &str = "cloud.provider";
pub const CLOUD_REGION: &str = "cloud.region";

pub const AWS_LOG_GROUP_NAMES: &str = "aws.log.group.names";
pub const AWS_LOG_STREAM_NAMES: &str = "aws.log.stream.names";

pub const K8S_CLUSTER_UID: &str = "sw.k8s.cluster.uid";
pub const K8S_NAMESPACE_NAME: &str = "k8s.namespace.name";
pub const K8S_POD_NAME: &str = "k8s.pod.name";
pub const K8S_POD_UID: &str = "k8s.pod.uid";
pub const K8S_CONTAINER_NAME: &str = "k8s.container.name";
pub const K8S_CONTAINER_IMAGE_NAME: &str = "k8s.container.image.name";
pub const K8S_NODE_NAME: &str = "k8s.node.name";
pub const CONTAINER_ID: &str = "container.id";
pub const K8S_MANIFEST_VERSION: &str = "sw.k8s.agent.manifest.version";

/// Prefix for one resource key per pod label. The label key is appended verbatim.
pub const K8S_POD_LABELS_PREFIX: &str = "k8s.pod.labels.";
/// Prefix for one resource key per pod annotation. The annotation key is appended verbatim.
pub const K8S_POD_ANNOTATIONS_PREFIX: &str = "k8s.pod.annotations.";

pub const CLOUD_PROVIDER_AWS: &str = "aws";
pub const CLOUD_PLATFORM_AWS_EC2: &str = "aws_ec2";
