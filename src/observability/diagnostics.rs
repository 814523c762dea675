//! Internal diagnostics.
//!
//! # Responsibilities
//! - Install the `tracing` subscriber the library reports through
//! - Keep diagnostics on stderr so they never mix with console log output
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the default filter
//! - Installing twice is not an error; the first subscriber wins

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "clinic_log=info";

/// Install a stderr `fmt` subscriber. Returns `false` if one was already set.
pub fn init_diagnostics(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .is_ok()
}
