//! Line formatting.
//!
//! # Data Flow
//! ```text
//! LoggerConfig.format + LoggerConfig.date_format
//!     → template.rs (compile once into segments)
//!     → Formatter::format(record) per line
//! ```
//!
//! # Design Decisions
//! - Templates use the `%(field)s` placeholders the settings files already
//!   carry, so existing `LOGGER` blocks keep working
//! - Compilation rejects unknown placeholders and bad strftime strings up
//!   front; formatting itself cannot fail

pub mod template;

pub use template::{check_date_format, compile_template, Formatter, DEFAULT_DATE_FORMAT, DEFAULT_FORMAT, MAX_FIELD_WIDTH};
