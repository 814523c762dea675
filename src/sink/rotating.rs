//! Midnight-rotating file writer.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime, TimeDelta, TimeZone};

use crate::format::Formatter;
use crate::record::LogRecord;
use crate::sink::layout::ensure_day_directory;
use crate::sink::RecordWriter;

struct OpenFile {
    path: PathBuf,
    out: BufWriter<File>,
    rollover_at: DateTime<Local>,
}

/// Appends formatted records to `<home>/logs/<YYYY>/<Month>/<D>/<name>.log`
/// and moves to the next day's file once a record's timestamp reaches the
/// local midnight following the moment the current file was opened.
///
/// Old files are never deleted.
pub struct RotatingFileWriter {
    home: PathBuf,
    name: String,
    formatter: Formatter,
    current: Option<OpenFile>,
}

impl RotatingFileWriter {
    /// Open the file for the day containing `now`, creating its directory.
    pub fn open(
        home: impl Into<PathBuf>,
        name: impl Into<String>,
        formatter: Formatter,
        now: DateTime<Local>,
    ) -> io::Result<Self> {
        let mut writer = Self {
            home: home.into(),
            name: name.into(),
            formatter,
            current: None,
        };
        writer.open_for(&now)?;
        Ok(writer)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the file currently being appended to.
    pub fn path(&self) -> Option<&Path> {
        self.current.as_ref().map(|open| open.path.as_path())
    }

    fn open_for(&mut self, at: &DateTime<Local>) -> io::Result<()> {
        if let Some(mut previous) = self.current.take() {
            if let Err(err) = previous.out.flush() {
                tracing::warn!(path = %previous.path.display(), error = %err, "flush before rotation failed");
            }
        }

        let dir = ensure_day_directory(&self.home, at)?;
        let path = dir.join(format!("{}.log", self.name));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        tracing::debug!(path = %path.display(), "opened log file");
        self.current = Some(OpenFile {
            path,
            out: BufWriter::new(file),
            rollover_at: next_midnight(at),
        });
        Ok(())
    }
}

impl RecordWriter for RotatingFileWriter {
    fn write_record(&mut self, record: &LogRecord) -> io::Result<()> {
        let due = match &self.current {
            Some(open) => record.timestamp >= open.rollover_at,
            None => true,
        };
        if due {
            self.open_for(&record.timestamp)?;
        }

        let mut line = self.formatter.format(record);
        line.push('\n');

        let open = self
            .current
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no log file open"))?;
        open.out.write_all(line.as_bytes())?;
        open.out.flush()
    }

    fn reopen(&mut self) -> io::Result<()> {
        // Any instant before the rollover falls on the open file's day.
        let at = self
            .current
            .take()
            .and_then(|open| open.rollover_at.checked_sub_signed(TimeDelta::seconds(1)))
            .unwrap_or_else(Local::now);
        self.open_for(&at)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.current.as_mut() {
            Some(open) => open.out.flush(),
            None => Ok(()),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        match self.current.take() {
            Some(mut open) => open.out.flush(),
            None => Ok(()),
        }
    }
}

/// First local midnight strictly after `at`. When midnight is skipped by a
/// DST change, the first local time that exists after it.
pub fn next_midnight(at: &DateTime<Local>) -> DateTime<Local> {
    at.date_naive()
        .succ_opt()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .and_then(|midnight| first_valid_from(midnight, |naive| Local.from_local_datetime(naive).earliest()))
        .unwrap_or_else(|| *at + TimeDelta::days(1))
}

/// Longest stretch of local time a DST transition can skip.
const MAX_DST_GAP_MINUTES: i64 = 3 * 60;

/// Resolve `start`, stepping forward a minute at a time through a gap.
fn first_valid_from<T>(start: NaiveDateTime, resolve: impl Fn(&NaiveDateTime) -> Option<T>) -> Option<T> {
    (0..=MAX_DST_GAP_MINUTES).find_map(|minutes| resolve(&(start + TimeDelta::minutes(minutes))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{DEFAULT_DATE_FORMAT, DEFAULT_FORMAT};
    use crate::record::{LogLevel, SourceLocation};
    use chrono::Timelike;

    fn formatter() -> Formatter {
        Formatter::new("%(levelname)s %(message)s", DEFAULT_DATE_FORMAT).unwrap()
    }

    fn record_at(at: DateTime<Local>, message: &str) -> LogRecord {
        LogRecord::new(LogLevel::Info, "assessment_view", message, SourceLocation::caller())
            .with_timestamp(at)
    }

    #[test]
    fn test_next_midnight() {
        let at = Local.with_ymd_and_hms(2025, 2, 28, 13, 5, 0).unwrap();
        let expected = Local.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(next_midnight(&at), expected);
    }

    #[test]
    fn test_midnight_inside_dst_gap_resolves_to_gap_end() {
        let midnight = chrono::NaiveDate::from_ymd_opt(2025, 3, 30)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        // Local clocks jump from 00:00 straight to 01:00.
        let resolved = first_valid_from(midnight, |naive| (naive.time().hour() >= 1).then_some(*naive));

        assert_eq!(resolved, Some(midnight + TimeDelta::hours(1)));
        assert_eq!(first_valid_from(midnight, |_| None::<NaiveDateTime>), None);
    }

    #[test]
    fn test_reopen_late_in_day_keeps_same_file() {
        let home = tempfile::tempdir().unwrap();
        let at = Local.with_ymd_and_hms(2025, 10, 25, 23, 59, 30).unwrap();
        let mut writer = RotatingFileWriter::open(home.path(), "patient_view", formatter(), at).unwrap();
        let before = writer.path().unwrap().to_path_buf();

        writer.reopen().unwrap();
        assert_eq!(writer.path().unwrap(), before.as_path());
    }

    #[test]
    fn test_appends_lines() {
        let home = tempfile::tempdir().unwrap();
        let at = Local.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap();
        let mut writer = RotatingFileWriter::open(home.path(), "assessment_view", formatter(), at).unwrap();

        writer.write_record(&record_at(at, "Assessment Created")).unwrap();
        writer.write_record(&record_at(at, "Assessment Updated")).unwrap();
        let path = writer.path().unwrap().to_path_buf();
        writer.close().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "INFO Assessment Created\nINFO Assessment Updated\n");
        assert!(path.ends_with("logs/2025/June/10/assessment_view.log"));
    }

    #[test]
    fn test_reopen_keeps_same_day_file() {
        let home = tempfile::tempdir().unwrap();
        let at = Local.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap();
        let mut writer = RotatingFileWriter::open(home.path(), "patient_view", formatter(), at).unwrap();
        let before = writer.path().unwrap().to_path_buf();

        writer.reopen().unwrap();
        assert_eq!(writer.path().unwrap(), before.as_path());
    }

    #[test]
    fn test_default_format_renders() {
        let home = tempfile::tempdir().unwrap();
        let at = Local.with_ymd_and_hms(2025, 6, 10, 21, 4, 5).unwrap();
        let formatter = Formatter::new(DEFAULT_FORMAT, DEFAULT_DATE_FORMAT).unwrap();
        let mut writer = RotatingFileWriter::open(home.path(), "patient_view", formatter, at).unwrap();

        writer.write_record(&record_at(at, "Patient Deleted")).unwrap();
        let content = std::fs::read_to_string(writer.path().unwrap()).unwrap();
        assert!(content.starts_with("INFO [06/10/2025 09:04:05 PM] "));
        assert!(content.trim_end().ends_with(" : Patient Deleted"));
    }
}
