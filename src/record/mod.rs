//! Log records.
//!
//! # Data Flow
//! ```text
//! ContextLogger / log_* macros
//!     → record.rs (LogRecord: level, time, pid/tid, group, location, message)
//!     → interpolate.rs (positional arguments rendered eagerly)
//!     → sink (console, file, or queue → drain worker → file)
//! ```
//!
//! # Design Decisions
//! - Records are rendered before they cross a queue; the drain worker never
//!   re-interpolates
//! - Error payloads travel as text, never as live error objects
//! - Levels keep the numeric values of the settings the backend shipped with

pub mod interpolate;
pub mod level;
pub mod record;

pub use level::{LogLevel, ParseLevelError};
pub use record::{LogRecord, SourceLocation};
