//! Console sink.

use std::io::{self, Write};

use parking_lot::Mutex;

use crate::format::Formatter;
use crate::record::LogRecord;
use crate::sink::{prepare_record, Sink, SinkKind};

/// Writes formatted lines to stdout (or any writer, for tests).
///
/// Each line goes out in a single `write_all` under the lock, so lines from
/// different threads never interleave.
pub struct ConsoleSink<W: Write + Send = io::Stdout> {
    out: Mutex<W>,
    formatter: Formatter,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout(formatter: Formatter) -> Self {
        Self::with_writer(io::stdout(), formatter)
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn with_writer(out: W, formatter: Formatter) -> Self {
        Self {
            out: Mutex::new(out),
            formatter,
        }
    }
}

impl<W: Write + Send> Sink for ConsoleSink<W> {
    fn kind(&self) -> SinkKind {
        SinkKind::Console
    }

    fn emit(&self, mut record: LogRecord) {
        prepare_record(&mut record);
        let mut line = self.formatter.format(&record);
        line.push('\n');

        let mut out = self.out.lock();
        if let Err(err) = out.write_all(line.as_bytes()).and_then(|()| out.flush()) {
            tracing::warn!(logger = %record.logger, error = %err, "console write failed");
        }
    }

    fn flush(&self) {
        let _ = self.out.lock().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{LogLevel, SourceLocation};

    #[test]
    fn test_writes_one_line_per_record() {
        let formatter = Formatter::new("%(levelname)s %(folder_name)s %(message)s", "%H").unwrap();
        let sink = ConsoleSink::with_writer(Vec::new(), formatter);

        let record = LogRecord::new(LogLevel::Error, "patient_view", "lookup of %s failed", SourceLocation::caller())
            .with_group(Some("views".into()))
            .with_args(vec!["MRN-0042".into()]);
        sink.emit(record);
        sink.emit(LogRecord::new(LogLevel::Info, "patient_view", "done", SourceLocation::caller()));

        let written = String::from_utf8(sink.out.lock().clone()).unwrap();
        assert_eq!(written, "ERROR views lookup of MRN-0042 failed\nINFO - done\n");
    }
}
