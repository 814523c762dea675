//! Contextual handle returned by the facade.

use std::error::Error;
use std::fmt::{self, Display};
use std::sync::Arc;

use crate::record::{LogLevel, LogRecord, SourceLocation};
use crate::sink::Sink;

/// Tags every record with a group label and forwards it to the shared sink.
///
/// Cloning is cheap. Every logging method is infallible: sink trouble is
/// reported through `tracing`, never to the caller.
#[derive(Clone)]
pub struct ContextLogger {
    name: String,
    group: Option<String>,
    level: LogLevel,
    sink: Arc<dyn Sink>,
}

impl fmt::Debug for ContextLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextLogger")
            .field("name", &self.name)
            .field("group", &self.group)
            .field("level", &self.level)
            .field("sink", &self.sink.kind())
            .finish()
    }
}

impl ContextLogger {
    pub fn new(name: impl Into<String>, group: Option<String>, level: LogLevel, sink: Arc<dyn Sink>) -> Self {
        Self {
            name: name.into(),
            group,
            level,
            sink,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Same sink and level, different group label.
    pub fn with_group(&self, group: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            ..self.clone()
        }
    }

    pub fn is_enabled_for(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[track_caller]
    pub fn warning(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[track_caller]
    pub fn critical(&self, message: impl Into<String>) {
        self.log(LogLevel::Critical, message);
    }

    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(LogLevel::FATAL, message);
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if self.is_enabled_for(level) {
            self.emit(self.record(SourceLocation::caller(), level, message));
        }
    }

    /// Log a `%s`-style template; arguments are rendered before the record
    /// reaches any queue.
    #[track_caller]
    pub fn log_args(&self, level: LogLevel, template: &str, args: &[&dyn Display]) {
        if !self.is_enabled_for(level) {
            return;
        }
        let args = args.iter().map(ToString::to_string).collect();
        self.emit(self.record(SourceLocation::caller(), level, template).with_args(args));
    }

    /// Log at `ERROR` with `err` and its source chain attached.
    #[track_caller]
    pub fn exception(&self, message: impl Into<String>, err: &(dyn Error + 'static)) {
        if self.is_enabled_for(LogLevel::Error) {
            self.emit(self.record(SourceLocation::caller(), LogLevel::Error, message).with_error(err));
        }
    }

    /// Entry point for the `log_*` macros, which supply the full location.
    pub fn log_at(&self, location: SourceLocation, level: LogLevel, message: impl Into<String>) {
        if self.is_enabled_for(level) {
            self.emit(self.record(location, level, message));
        }
    }

    pub fn flush(&self) {
        self.sink.flush();
    }

    fn record(&self, location: SourceLocation, level: LogLevel, message: impl Into<String>) -> LogRecord {
        LogRecord::new(level, self.name.as_str(), message, location).with_group(self.group.clone())
    }

    fn emit(&self, record: LogRecord) {
        self.sink.emit(record);
    }
}
