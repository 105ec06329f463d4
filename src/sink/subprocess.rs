use std::io::{BufWriter, Write};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};

use tracing::{info, warn};

use crate::errors::{LoaderError, Result};
use crate::types::MountainRecord;

use super::MountainSink;

/// Delegating writer: streams each record as one CRLF-terminated JSON line
/// to the stdin of a child process.
///
/// Closing stdin is the end-of-input signal. The child is always waited on,
/// either by [`MountainSink::finish`] or when the sink is dropped.
pub struct SubprocessSink {
    child: Child,
    stdin: Option<BufWriter<ChildStdin>>,
    program: String,
}

impl SubprocessSink {
    /// Spawns `command[0]` with the remaining elements as arguments.
    pub fn spawn(command: &[String]) -> Result<Self> {
        let (program, args) = command.split_first().ok_or_else(|| LoaderError::Config {
            message: "the subprocess sink needs a command".to_string(),
        })?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| LoaderError::Sink {
                message: format!("failed to spawn: {e}"),
                sink: program.clone(),
            })?;

        let stdin = child.stdin.take().map(BufWriter::new);
        info!("Spawned sink process {} (pid {})", program, child.id());

        Ok(Self {
            child,
            stdin,
            program: program.clone(),
        })
    }

    fn sink_error(&self, message: String) -> LoaderError {
        LoaderError::Sink {
            message,
            sink: self.program.clone(),
        }
    }

    /// Flushes and closes stdin, then waits for the child to exit.
    ///
    /// The child is waited on even when the flush fails; the flush error is
    /// reported afterwards.
    fn close(&mut self) -> Result<ExitStatus> {
        let flushed = match self.stdin.take() {
            Some(mut writer) => writer.flush(),
            None => Ok(()),
        };
        let status = self.child.wait()?;
        flushed.map_err(|e| self.sink_error(format!("failed to flush input: {e}")))?;
        Ok(status)
    }
}

impl MountainSink for SubprocessSink {
    fn insert_mountain(&mut self, record: &MountainRecord) -> Result<()> {
        if let Some(status) = self.child.try_wait()? {
            return Err(self.sink_error(format!("{} has died ({status})", self.program)));
        }
        info!("Inserting via {}: {}", self.program, record.uri);

        let line = serde_json::to_string(record)?;
        let Some(writer) = self.stdin.as_mut() else {
            return Err(LoaderError::Sink {
                message: "input already closed".to_string(),
                sink: self.program.clone(),
            });
        };
        writer
            .write_all(line.as_bytes())
            .and_then(|_| writer.write_all(b"\r\n"))
            .map_err(|e| LoaderError::Sink {
                message: format!("failed to write {}: {e}", record.uri),
                sink: self.program.clone(),
            })
    }

    fn finish(mut self: Box<Self>) -> Result<()> {
        let status = self.close()?;
        if !status.success() {
            return Err(self.sink_error(format!("exited with {status}")));
        }
        Ok(())
    }
}

impl Drop for SubprocessSink {
    fn drop(&mut self) {
        if self.stdin.is_some() {
            if let Err(e) = self.close() {
                warn!("Closing {} failed: {}", self.program, e);
            }
        }
    }
}
