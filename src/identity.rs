//! Implicit identity carried by CloudWatch log stream names.
//!
//! EC2 agents usually name their streams after the instance (`i-0abc...`) or
//! the private DNS host (`ip-10-0-0-1...`), and many stream names embed the
//! region. Both extractions are best-effort: no match means no fallback.

use once_cell::sync::Lazy;
use regex::Regex;

static HOST_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<host_id>(?:i-|ip-)[0-9A-Za-z_\-]+)").expect("host id regex is valid")
});

static REGION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<region>[0-9A-Za-z_]{2}-[0-9A-Za-z_]+-[0-9]+)").expect("region regex is valid")
});

/// Host id token at the start of `log_stream`, e.g. `i-0abc123` or `ip-10-0-0-1`.
pub fn parse_host_id(log_stream: &str) -> Option<&str> {
    HOST_ID_REGEX
        .captures(log_stream)
        .and_then(|caps| caps.name("host_id"))
        .map(|m| m.as_str())
}

/// First region-shaped token anywhere in `log_stream`, e.g. `us-east-1`.
pub fn parse_region(log_stream: &str) -> Option<&str> {
    REGION_REGEX
        .captures(log_stream)
        .and_then(|caps| caps.name("region"))
        .map(|m| m.as_str())
}

/// The four attributes that together identify one container's log output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerIdentity {
    pub cluster_uid: String,
    pub namespace_name: String,
    pub pod_uid: String,
    pub container_name: String,
}

impl ContainerIdentity {
    pub fn new(
        cluster_uid: impl Into<String>,
        namespace_name: impl Into<String>,
        pod_uid: impl Into<String>,
        container_name: impl Into<String>,
    ) -> Self {
        ContainerIdentity {
            cluster_uid: cluster_uid.into(),
            namespace_name: namespace_name.into(),
            pod_uid: pod_uid.into(),
            container_name: container_name.into(),
        }
    }
}
