//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Drain worker write fails:
//!     → backoff.rs (delay grows exponentially, capped, jittered)
//!     → writer reopened, record retried
//!     → after max_restarts consecutive failures the worker gives up
//! ```
//!
//! # Design Decisions
//! - Every delay carries 0-10% jitter
//! - Restart limits come from `[logger.queue]`, not constants

pub mod backoff;

pub use backoff::Backoff;
