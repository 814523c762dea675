//! Output sinks.
//!
//! # Data Flow
//! ```text
//! ContextLogger
//!     → console.rs (stdout, one write per line)
//!     → file.rs (mutex → rotating.rs)
//!     → queued.rs (bounded queue → drain worker → rotating.rs)
//!
//! rotating.rs:
//!     record timestamp crosses local midnight
//!     → layout.rs (logs/<YYYY>/<Month>/<D>/<name>.log)
//!     → new file opened
//! ```
//!
//! # Design Decisions
//! - `Sink::emit` is infallible; failures go to diagnostics, not callers
//! - Only one thread ever writes a given file: either behind a mutex or
//!   from a single drain worker
//! - Rotation follows record time, so late records stay in the open file

pub mod console;
pub mod file;
pub mod layout;
pub mod queued;
pub mod rotating;

use std::io;

use crate::record::LogRecord;

pub use console::ConsoleSink;
pub use file::FileSink;
pub use queued::{QueueStats, QueuedFileSink, WorkerEvent, WorkerState};
pub use rotating::RotatingFileWriter;

/// Sink family, used as half of the registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    Console,
    File,
}

/// A destination for records bound to one logical name.
pub trait Sink: Send + Sync {
    fn kind(&self) -> SinkKind;

    /// Deliver one record. Never fails from the caller's point of view.
    fn emit(&self, record: LogRecord);

    fn flush(&self) {}

    /// Release resources. Later `emit` calls are discarded.
    fn close(&self) {}
}

/// Render positional arguments, reporting a mismatch instead of failing.
pub(crate) fn prepare_record(record: &mut LogRecord) {
    if let Err(err) = record.prepare() {
        tracing::warn!(
            logger = %record.logger,
            file = record.location.file,
            line = record.location.line,
            error = %err,
            "log message arguments did not match its template"
        );
    }
}

/// The I/O end of a file sink: formats and persists already-prepared records.
///
/// Queued sinks hand the writer to their drain worker, so it only has to be
/// `Send`.
pub trait RecordWriter: Send + 'static {
    fn write_record(&mut self, record: &LogRecord) -> io::Result<()>;

    /// Reopen the underlying file after a failed write.
    fn reopen(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()>;

    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }
}
