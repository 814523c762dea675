//! Shared utilities for integration tests.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use clinic_log::config::{LoggerConfig, QueueConfig};
use clinic_log::sink::RecordWriter;
use clinic_log::LogRecord;
use tempfile::TempDir;

/// Config rooted in a fresh temp dir, rendering only the message.
pub fn temp_config() -> (TempDir, LoggerConfig) {
    let home = tempfile::tempdir().unwrap();
    let config = LoggerConfig {
        format: "%(message)s".into(),
        home_path: Some(home.path().to_path_buf()),
        queue: fast_queue(),
        ..LoggerConfig::default()
    };
    (home, config)
}

/// Queue settings with millisecond backoff.
pub fn fast_queue() -> QueueConfig {
    QueueConfig {
        backoff_base_ms: 1,
        backoff_max_ms: 5,
        ..QueueConfig::default()
    }
}

pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect()
}

/// Every `*.log` file under `dir`, sorted.
#[allow(dead_code)]
pub fn log_files(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().is_some_and(|ext| ext == "log") {
                found.push(path);
            }
        }
    }
    found.sort();
    found
}

/// Writer that fails after `healthy` successful writes, counting attempts.
#[allow(dead_code)]
pub struct BrokenWriter {
    pub healthy: u32,
    pub written: Arc<AtomicUsize>,
    pub attempts: Arc<AtomicU32>,
}

#[allow(dead_code)]
impl BrokenWriter {
    pub fn new(healthy: u32) -> Self {
        Self {
            healthy,
            written: Arc::new(AtomicUsize::new(0)),
            attempts: Arc::new(AtomicU32::new(0)),
        }
    }
}

impl RecordWriter for BrokenWriter {
    fn write_record(&mut self, _record: &LogRecord) -> io::Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.healthy == 0 {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only filesystem"));
        }
        self.healthy -= 1;
        self.written.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
