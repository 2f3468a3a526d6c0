use crate::record::LogsDocument;
use crate::sink::LogSink;
use async_trait::async_trait;
use std::error::Error;
use std::io::Write;

/// Prints each document to stdout as a single line of JSON.
#[derive(Clone, Debug, Default)]
pub struct ConsoleSink {
    pub pretty: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn render(&self, document: &LogsDocument) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(document)
        } else {
            serde_json::to_string(document)
        }
    }
}

#[async_trait]
impl LogSink for ConsoleSink {
    async fn send(&self, document: &LogsDocument) -> Result<(), Box<dyn Error + Send + Sync>> {
        let line = self.render(document)?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        Ok(())
    }

    async fn flush(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        std::io::stdout().flush()?;
        Ok(())
    }
}
