//! clinic-log
//!
//! Command-line front end for the logging subsystem: write records the way
//! the backend views do, pipe text into a log stream, and exercise the
//! queued sink under concurrent load.
//!
//! ```text
//! clinic-log [--config settings.toml] emit   --name patient_view --group views "Patient Created"
//! clinic-log [--config settings.toml] pipe   --name import_job --multiprocess < lines.txt
//! clinic-log [--config settings.toml] stress --name load --producers 8 --count 10000
//! clinic-log [--config settings.toml] config
//! ```

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use chrono::Local;
use clap::{Parser, Subcommand};

use clinic_log::config::load_logger_config;
use clinic_log::format::Formatter;
use clinic_log::observability::{init_diagnostics, DEFAULT_FILTER};
use clinic_log::sink::RotatingFileWriter;
use clinic_log::{ContextLogger, LogLevel, Logger, LoggerConfig, QueuedFileSink, Sink, SinkRegistry};

#[derive(Parser)]
#[command(name = "clinic-log")]
#[command(about = "Per-component logging for the patient-records backend", long_about = None)]
struct Cli {
    /// Settings file with a `[logger]` table
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a single record
    Emit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        group: Option<String>,
        #[arg(long, default_value = "INFO")]
        level: LogLevel,
        /// Write to stdout instead of the day's log file
        #[arg(long)]
        console: bool,
        /// Go through the queued sink and its drain worker
        #[arg(long)]
        multiprocess: bool,
        message: String,
    },
    /// Log every line read from stdin
    Pipe {
        #[arg(long)]
        name: String,
        #[arg(long)]
        group: Option<String>,
        #[arg(long, default_value = "INFO")]
        level: LogLevel,
        #[arg(long)]
        console: bool,
        #[arg(long)]
        multiprocess: bool,
    },
    /// Push records from several threads through one queued sink
    Stress {
        #[arg(long, default_value = "stress")]
        name: String,
        #[arg(long, default_value_t = 4)]
        producers: usize,
        #[arg(long, default_value_t = 1000)]
        count: usize,
    },
    /// Print the resolved configuration as JSON
    Config,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_diagnostics(DEFAULT_FILTER);

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_logger_config(path)?,
        None => LoggerConfig::default(),
    };

    tracing::debug!(
        config_file = ?cli.config,
        log_level = %config.log_level,
        home = %config.resolved_home().display(),
        "configuration loaded"
    );

    match cli.command {
        Commands::Emit {
            name,
            group,
            level,
            console,
            multiprocess,
            message,
        } => {
            let registry = Arc::new(SinkRegistry::new());
            let logger = Logger::new(name, Some(config), console, Arc::clone(&registry))?;
            let handle = logger.get_logger(multiprocess, group.as_deref())?;
            handle.log(level, message);
            registry.close_all();
        }
        Commands::Pipe {
            name,
            group,
            level,
            console,
            multiprocess,
        } => {
            let registry = Arc::new(SinkRegistry::new());
            let logger = Logger::new(name, Some(config), console, Arc::clone(&registry))?;
            let handle = logger.get_logger(multiprocess, group.as_deref())?;

            let mut lines = 0u64;
            for line in io::stdin().lock().lines() {
                handle.log(level, line?);
                lines += 1;
            }
            registry.close_all();
            tracing::info!(lines, "stdin drained");
        }
        Commands::Stress { name, producers, count } => {
            run_stress(&config, &name, producers, count)?;
        }
        Commands::Config => {
            let mut resolved = config;
            resolved.home_path = Some(resolved.resolved_home());
            println!("{}", serde_json::to_string_pretty(&resolved)?);
        }
    }

    Ok(())
}

fn run_stress(
    config: &LoggerConfig,
    name: &str,
    producers: usize,
    count: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let level: LogLevel = config.log_level.parse()?;
    let formatter = Formatter::new(&config.format, &config.date_format)?;
    let writer = RotatingFileWriter::open(config.resolved_home(), name, formatter, Local::now())?;
    let path = writer.path().map(|path| path.display().to_string());
    let sink = Arc::new(QueuedFileSink::start(name, writer, &config.queue)?);

    let started = Instant::now();
    thread::scope(|scope| {
        for producer in 0..producers {
            let shared: Arc<dyn Sink> = sink.clone();
            let handle = ContextLogger::new(name, Some(format!("producer-{producer}")), level, shared);
            scope.spawn(move || {
                for i in 0..count {
                    handle.log_args(LogLevel::Info, "record %d from producer %d", &[&i, &producer]);
                }
            });
        }
    });
    sink.close();

    let stats = sink.stats();
    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        path = path.as_deref().unwrap_or("-"),
        "stress run finished"
    );
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
