//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Library internals (drain worker, sinks, facade):
//!     → tracing events (failures, restarts, rotation)
//!     → diagnostics.rs subscriber (stderr)
//!
//! Queued sinks additionally expose:
//!     → QueueStats (counters, worker state)
//!     → WorkerEvent status channel
//! ```
//!
//! # Design Decisions
//! - Diagnostics about logging never go through the log sinks themselves
//! - The library only emits `tracing` events; binaries decide whether to
//!   install a subscriber

pub mod diagnostics;

pub use diagnostics::{init_diagnostics, DEFAULT_FILTER};
