//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{LoggerConfig, Settings};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_settings(&content)
}

/// Parse and validate settings from TOML text.
pub fn parse_settings(content: &str) -> Result<Settings, ConfigError> {
    let settings: Settings = toml::from_str(content)?;
    validate_config(&settings.logger).map_err(ConfigError::Validation)?;
    Ok(settings)
}

/// Load only the `[logger]` block of a settings file.
pub fn load_logger_config(path: &Path) -> Result<LoggerConfig, ConfigError> {
    load_settings(path).map(|settings| settings.logger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [logger]
            log_level = "WARNING"
            date_format = "%Y-%m-%d %H:%M:%S"
            home_path = "/var/lib/clinic"
            "#
        )
        .unwrap();

        let config = load_logger_config(file.path()).unwrap();
        assert_eq!(config.log_level, "WARNING");
        assert_eq!(config.date_format, "%Y-%m-%d %H:%M:%S");
        assert_eq!(config.resolved_home(), Path::new("/var/lib/clinic"));
    }

    #[test]
    fn test_reports_every_validation_error() {
        let err = parse_settings(
            r#"
            [logger]
            log_level = "LOUD"
            format = "%(patient_id)s %(message)s"
            "#,
        )
        .unwrap_err();

        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = load_settings(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_syntax_error() {
        let err = parse_settings("[logger\nlog_level = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
