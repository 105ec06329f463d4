use tracing::info;

use crate::errors::Result;
use crate::types::MountainRecord;

use super::MountainSink;

/// Dry-run sink: logs each record as JSON and stores nothing.
pub struct LogSink {
    log_raw_parsed: bool,
}

impl LogSink {
    pub fn new(log_raw_parsed: bool) -> Self {
        Self { log_raw_parsed }
    }

    /// Renders `record` the way it is logged. Unless raw logging is enabled,
    /// `raw_parsed` is replaced by `"<redacted>"`.
    pub fn render(&self, record: &MountainRecord) -> Result<String> {
        let mut value = serde_json::to_value(record)?;
        if !self.log_raw_parsed {
            value["raw_parsed"] = serde_json::Value::String("<redacted>".to_string());
        }
        Ok(serde_json::to_string(&value)?)
    }
}

impl MountainSink for LogSink {
    fn insert_mountain(&mut self, record: &MountainRecord) -> Result<()> {
        info!("{}", self.render(record)?);
        Ok(())
    }
}
