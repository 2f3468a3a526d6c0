use crate::record::LogsDocument;
use crate::sink::LogSink;
use async_trait::async_trait;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A sink that simply drops all documents.
///
/// Useful for measuring the overhead of routing and document assembly
/// without any export cost.
#[derive(Clone, Default)]
pub struct NoopSink;

#[async_trait]
impl LogSink for NoopSink {
    async fn send(&self, _document: &LogsDocument) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}

/// A sink that keeps every document it receives, in arrival order.
#[derive(Clone, Default)]
pub struct MemorySink {
    documents: Arc<Mutex<Vec<LogsDocument>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything received so far.
    pub async fn take(&self) -> Vec<LogsDocument> {
        std::mem::take(&mut *self.documents.lock().await)
    }

    pub async fn len(&self) -> usize {
        self.documents.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.lock().await.is_empty()
    }
}

#[async_trait]
impl LogSink for MemorySink {
    async fn send(&self, document: &LogsDocument) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.documents.lock().await.push(document.clone());
        Ok(())
    }
}
