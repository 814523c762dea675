//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML, `[logger]` table)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → LoggerConfig (validated, immutable)
//!     → handed to each Logger facade
//! ```
//!
//! # Design Decisions
//! - Config is immutable once a facade is built
//! - All fields have defaults so a missing `LOGGER` key falls back cleanly
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_logger_config, load_settings, parse_settings, ConfigError};
pub use schema::{LoggerConfig, OverflowPolicy, QueueConfig, Settings, HOME_PATH_ENV};
pub use validation::{validate_config, ValidationError};
