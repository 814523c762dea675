//! Date-stamped log directory layout.
//!
//! `<home>/logs/<YYYY>/<FullMonthName>/<D>/<name>.log`, day without padding.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Local};

pub fn day_directory(home: &Path, at: &DateTime<Local>) -> PathBuf {
    home.join("logs")
        .join(at.year().to_string())
        .join(at.format("%B").to_string())
        .join(at.day().to_string())
}

pub fn log_file_path(home: &Path, name: &str, at: &DateTime<Local>) -> PathBuf {
    day_directory(home, at).join(format!("{name}.log"))
}

/// Create the day directory if missing. Safe against a concurrent creator.
pub fn ensure_day_directory(home: &Path, at: &DateTime<Local>) -> io::Result<PathBuf> {
    let dir = day_directory(home, at);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_layout() {
        let at = Local.with_ymd_and_hms(2025, 9, 4, 8, 30, 0).unwrap();
        assert_eq!(
            log_file_path(Path::new("/srv"), "patient_view", &at),
            PathBuf::from("/srv/logs/2025/September/4/patient_view.log")
        );
    }

    #[test]
    fn test_creates_missing_directories() {
        let home = tempfile::tempdir().unwrap();
        let at = Local.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap();

        let dir = ensure_day_directory(home.path(), &at).unwrap();
        assert!(dir.is_dir());
        assert!(dir.ends_with("logs/2024/December/31"));

        // Second call is a no-op.
        assert_eq!(ensure_day_directory(home.path(), &at).unwrap(), dir);
    }
}
