//! Per-component logging for the patient-records backend.
//!
//! # Architecture Overview
//!
//! ```text
//!     view code
//!        │  logger.info("Patient Created") / log_error!(logger, ...)
//!        ▼
//!   ┌───────────────┐   registry: (name, kind) → sink
//!   │ ContextLogger │──────────────────────────────┐
//!   └───────────────┘                              │
//!                                                  ▼
//!        ┌──────────────┬──────────────────┬───────────────────────────┐
//!        │ ConsoleSink  │ FileSink (mutex) │ QueuedFileSink            │
//!        │   stdout     │        │         │  bounded queue            │
//!        │              │        │         │    → drain worker thread  │
//!        └──────────────┴────────┼─────────┴─────────────┼─────────────┘
//!                                ▼                       ▼
//!                      RotatingFileWriter (midnight rollover)
//!                      <home>/logs/<YYYY>/<Month>/<D>/<name>.log
//! ```

pub mod config;
pub mod error;
pub mod facade;
pub mod format;
pub mod observability;
pub mod record;
pub mod registry;
pub mod resilience;
pub mod sink;

pub use config::{LoggerConfig, OverflowPolicy, QueueConfig, Settings};
pub use error::{FormatError, LogError};
pub use facade::{ContextLogger, Logger};
pub use record::{LogLevel, LogRecord, SourceLocation};
pub use registry::SinkRegistry;
pub use sink::{QueueStats, QueuedFileSink, Sink, SinkKind, WorkerEvent, WorkerState};
