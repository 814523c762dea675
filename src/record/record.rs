//! The log record carried from a handle to its sink.

use std::cell::Cell;
use std::error::Error;
use std::fmt::Write as _;
use std::panic::Location;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use chrono::{DateTime, Local};

use crate::error::FormatError;
use crate::record::interpolate::interpolate;
use crate::record::level::LogLevel;

/// Where a record was emitted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: &'static str,
    pub line: u32,
    /// Enclosing function, empty when the record came from a plain method
    /// call rather than one of the `log_*` macros.
    pub function: &'static str,
}

impl SourceLocation {
    pub const fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        Self { file, line, function }
    }

    /// Location of the caller of the `#[track_caller]` chain.
    #[track_caller]
    pub fn caller() -> Self {
        let loc = Location::caller();
        Self::new(loc.file(), loc.line(), "")
    }

    /// Base name of the source file.
    pub fn filename(&self) -> &'static str {
        Path::new(self.file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(self.file)
    }

    /// Source file name without its extension.
    pub fn module(&self) -> &'static str {
        Path::new(self.file)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(self.file)
    }
}

/// One emitted event.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    pub timestamp: DateTime<Local>,
    pub process_id: u32,
    pub thread_id: u64,
    pub thread_name: Option<String>,
    /// Name of the log stream (file stem or registry key).
    pub logger: String,
    /// Group label bound by the contextual handle.
    pub group: Option<String>,
    pub location: SourceLocation,
    pub message: String,
    /// Positional arguments for `%s` conversions in `message`.
    pub args: Vec<String>,
    /// Rendered error chain, if any.
    pub error: Option<String>,
}

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID: Cell<u64> = const { Cell::new(0) };
}

/// Small, stable numeric id for the current thread.
pub fn current_thread_id() -> u64 {
    THREAD_ID.with(|id| {
        if id.get() == 0 {
            id.set(NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed));
        }
        id.get()
    })
}

impl LogRecord {
    pub fn new(
        level: LogLevel,
        logger: impl Into<String>,
        message: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        let current = thread::current();
        Self {
            level,
            timestamp: Local::now(),
            process_id: std::process::id(),
            thread_id: current_thread_id(),
            thread_name: current.name().map(str::to_owned),
            logger: logger.into(),
            group: None,
            location,
            message: message.into(),
            args: Vec::new(),
            error: None,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_group(mut self, group: Option<String>) -> Self {
        self.group = group;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Attach an error and its `source()` chain as text.
    pub fn with_error(mut self, err: &(dyn Error + 'static)) -> Self {
        self.error = Some(render_error_chain(err));
        self
    }

    /// Render positional arguments into the message so the record can be
    /// queued as plain data.
    ///
    /// On a mismatch the record is still made persistable: the raw template
    /// is kept and the unused arguments are appended. The error is returned
    /// so the caller can report it.
    pub fn prepare(&mut self) -> Result<(), FormatError> {
        if self.args.is_empty() {
            return Ok(());
        }
        let args = std::mem::take(&mut self.args);
        match interpolate(&self.message, &args) {
            Ok(message) => {
                self.message = message;
                Ok(())
            }
            Err(err) => {
                let _ = write!(self.message, " (unformatted args: {})", args.join(", "));
                Err(err)
            }
        }
    }
}

fn render_error_chain(err: &(dyn Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(out, "\n  caused by: {cause}");
        source = cause.source();
    }
    out
}
