use crate::record::LogsDocument;
use async_trait::async_trait;
use std::error::Error;

/// Asynchronous destination for materialized [`LogsDocument`]s.
///
/// Implementations own the wire encoding and delivery of a document (OTLP
/// over gRPC or HTTP, a file, stdout, etc). The dispatcher hands each document
/// over exactly once and does not retry on failure.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Deliver a single document.
    ///
    /// **Returns**
    /// - `Ok(())` if the document was accepted by the backend.
    /// - `Err(..)` if the backend failed. The document is not resubmitted.
    async fn send(&self, document: &LogsDocument) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Flush any buffered documents, if the backend implements buffering.
    ///
    /// Default implementation is a no-op.
    async fn flush(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}
