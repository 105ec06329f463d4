//! Destinations for resolved records.
//!
//! Every sink implements [`MountainSink`]; the concrete one is chosen once at
//! startup from [`SinkConfig`] and used only through the trait.

mod logging;
mod sqlite;
mod subprocess;

use serde::{Deserialize, Serialize};

use crate::config::SinkConfig;
use crate::errors::Result;
use crate::types::MountainRecord;

pub use self::logging::LogSink;
pub use self::sqlite::SqliteSink;
pub use self::subprocess::SubprocessSink;

/// Receives resolved records, one call per record.
pub trait MountainSink {
    /// Persists one record.
    fn insert_mountain(&mut self, record: &MountainRecord) -> Result<()>;

    /// Flushes and releases the sink, reporting failures that happen while
    /// closing.
    fn finish(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

/// Available sink implementations.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Insert rows into a SQLite database.
    Sqlite,
    /// Stream JSON lines to a child process.
    Subprocess,
    /// Only log each record.
    #[default]
    Log,
}

impl SinkKind {
    /// Returns the string representation of this sink kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkKind::Sqlite => "sqlite",
            SinkKind::Subprocess => "subprocess",
            SinkKind::Log => "log",
        }
    }
}

/// Opens the sink selected by `config`.
pub fn open_sink(config: &SinkConfig) -> Result<Box<dyn MountainSink>> {
    let sink: Box<dyn MountainSink> = match config.kind {
        SinkKind::Sqlite => Box::new(SqliteSink::open(&config.sqlite_path)?),
        SinkKind::Subprocess => Box::new(SubprocessSink::spawn(&config.command)?),
        SinkKind::Log => Box::new(LogSink::new(config.log_raw_parsed)),
    };
    Ok(sink)
}
