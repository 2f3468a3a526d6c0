//! Assembles OTLP-shaped log documents from CloudWatch log events and the
//! Kubernetes workload metadata attached to them.
//!
//! [`builder::OtlpRequestBuilder`] accumulates one document per source;
//! [`dispatch::Dispatcher`] routes events to builders and hands finished
//! documents to a [`sink::LogSink`].

pub mod attributes;
pub mod record;
pub mod identity;
pub mod builder;
pub mod event;
pub mod dispatch;
pub mod sink;
pub mod noop_sink;

#[cfg(feature = "console")]
pub mod console;

pub mod env;
pub mod init;

pub use builder::OtlpRequestBuilder;
pub use identity::ContainerIdentity;
pub use record::{AttributeValue, LogEntry, LogsDocument, RawAttributes};
