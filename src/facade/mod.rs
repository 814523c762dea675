//! Logger facade and contextual handles.
//!
//! # Data Flow
//! ```text
//! Logger::new(name, config, log_to_console, registry)
//!     → validate + compile formatter and level
//! Logger::get_logger(is_multiprocess, group)
//!     → registry lookup by (name, kind)
//!     → first time only: create day directory, build sink
//!         console            → ConsoleSink
//!         file               → FileSink (mutex around the rotating writer)
//!         file, multiprocess → QueuedFileSink (drain worker)
//!     → ContextLogger { group, level, sink }
//! ```
//!
//! # Design Decisions
//! - Construction is the only fallible step; logging itself never errors
//! - Repeat calls for the same name share one sink, so output is never
//!   duplicated, console included
//! - Level filtering happens in the handle, before a record is built

pub mod handle;
pub mod logger;
mod macros;

pub use handle::ContextLogger;
pub use logger::Logger;
