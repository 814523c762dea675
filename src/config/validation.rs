//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the level name, the line template and the strftime template
//! - Validate queue ranges (capacity > 0, backoff base <= max)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LoggerConfig → Result<(), Vec<ValidationError>>
//! - Runs before a config is accepted by a logger facade

use thiserror::Error;

use crate::config::schema::LoggerConfig;
use crate::error::FormatError;
use crate::format::{check_date_format, compile_template};
use crate::record::LogLevel;

/// A single semantic problem in a `[logger]` block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("logger.log_level: unknown level `{0}`")]
    UnknownLevel(String),

    #[error("logger.format: {0}")]
    Format(FormatError),

    #[error("logger.date_format: {0}")]
    DateFormat(FormatError),

    #[error("logger.queue.capacity must be greater than 0")]
    ZeroCapacity,

    #[error("logger.queue.backoff_base_ms ({base}) exceeds backoff_max_ms ({max})")]
    BackoffRange { base: u64, max: u64 },
}

pub fn validate_config(config: &LoggerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.log_level.parse::<LogLevel>().is_err() {
        errors.push(ValidationError::UnknownLevel(config.log_level.clone()));
    }
    if let Err(err) = compile_template(&config.format) {
        errors.push(ValidationError::Format(err));
    }
    if let Err(err) = check_date_format(&config.date_format) {
        errors.push(ValidationError::DateFormat(err));
    }
    if config.queue.capacity == 0 {
        errors.push(ValidationError::ZeroCapacity);
    }
    if config.queue.backoff_base_ms > config.queue.backoff_max_ms {
        errors.push(ValidationError::BackoffRange {
            base: config.queue.backoff_base_ms,
            max: config.queue.backoff_max_ms,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
