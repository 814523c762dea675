//! Logger facade: one per log stream name.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;

use crate::config::{validate_config, ConfigError, LoggerConfig, ValidationError};
use crate::error::LogError;
use crate::facade::handle::ContextLogger;
use crate::format::Formatter;
use crate::record::LogLevel;
use crate::registry::SinkRegistry;
use crate::sink::layout::log_file_path;
use crate::sink::{ConsoleSink, FileSink, QueuedFileSink, RotatingFileWriter, Sink, SinkKind};

/// Per-name logging configuration, validated and compiled once.
///
/// Handing out handles is cheap; the sink behind them is built on the first
/// [`Logger::get_logger`] call for this name and shared afterwards through
/// the registry.
pub struct Logger {
    name: String,
    default_group: Option<String>,
    config: LoggerConfig,
    level: LogLevel,
    formatter: Formatter,
    log_to_console: bool,
    registry: Arc<SinkRegistry>,
}

impl Logger {
    /// Build a facade for `name`. `None` takes the default configuration.
    pub fn new(
        name: impl Into<String>,
        config: Option<LoggerConfig>,
        log_to_console: bool,
        registry: Arc<SinkRegistry>,
    ) -> Result<Self, LogError> {
        let config = config.unwrap_or_default();
        validate_config(&config).map_err(ConfigError::Validation)?;

        let level = config
            .log_level
            .parse::<LogLevel>()
            .map_err(|err| ConfigError::Validation(vec![ValidationError::UnknownLevel(err.0)]))?;
        let formatter = Formatter::new(&config.format, &config.date_format)?;

        Ok(Self {
            name: name.into(),
            default_group: None,
            config,
            level,
            formatter,
            log_to_console,
            registry,
        })
    }

    /// Facade named after a source file, grouped by its directory:
    /// `app/views/patient_view.rs` logs as `patient_view` in group `views`.
    pub fn for_source_file(
        path: impl AsRef<Path>,
        config: Option<LoggerConfig>,
        log_to_console: bool,
        registry: Arc<SinkRegistry>,
    ) -> Result<Self, LogError> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "root".to_string());
        let group = path
            .parent()
            .and_then(Path::file_name)
            .map(|dir| dir.to_string_lossy().into_owned());

        let mut logger = Self::new(name, config, log_to_console, registry)?;
        logger.default_group = group;
        Ok(logger)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<SinkRegistry> {
        &self.registry
    }

    /// Return a handle tagged with `group` (or the facade's default group).
    ///
    /// The first call for this name registers its sink; later calls reuse it
    /// whatever `is_multiprocess` they pass.
    pub fn get_logger(&self, is_multiprocess: bool, group: Option<&str>) -> Result<ContextLogger, LogError> {
        let kind = if self.log_to_console {
            SinkKind::Console
        } else {
            SinkKind::File
        };
        let sink = self
            .registry
            .get_or_try_insert_with(&self.name, kind, || self.build_sink(kind, is_multiprocess))?;

        let group = group.map(str::to_owned).or_else(|| self.default_group.clone());
        Ok(ContextLogger::new(self.name.clone(), group, self.level, sink))
    }

    /// Path the file sink for this name writes to right now.
    pub fn current_log_path(&self) -> PathBuf {
        log_file_path(&self.config.resolved_home(), &self.name, &Local::now())
    }

    fn build_sink(&self, kind: SinkKind, is_multiprocess: bool) -> Result<Arc<dyn Sink>, LogError> {
        if kind == SinkKind::Console {
            return Ok(Arc::new(ConsoleSink::stdout(self.formatter.clone())));
        }

        let home = self.config.resolved_home();
        let now = Local::now();
        let init_error = |source| LogError::Init {
            name: self.name.clone(),
            path: log_file_path(&home, &self.name, &now),
            source,
        };

        let writer = RotatingFileWriter::open(home.clone(), self.name.clone(), self.formatter.clone(), now)
            .map_err(init_error)?;

        tracing::info!(
            logger = %self.name,
            home = %home.display(),
            multiprocess = is_multiprocess,
            "file sink created"
        );

        if is_multiprocess {
            let sink = QueuedFileSink::start(self.name.clone(), writer, &self.config.queue).map_err(init_error)?;
            Ok(Arc::new(sink))
        } else {
            Ok(Arc::new(FileSink::new(writer)))
        }
    }
}
