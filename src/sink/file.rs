//! Synchronous file sink.

use parking_lot::Mutex;

use crate::record::LogRecord;
use crate::sink::rotating::RotatingFileWriter;
use crate::sink::{prepare_record, RecordWriter, Sink, SinkKind};

/// A rotating writer behind a mutex; the caller's thread does the I/O.
pub struct FileSink<W: RecordWriter = RotatingFileWriter> {
    writer: Mutex<Option<W>>,
}

impl<W: RecordWriter> FileSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(Some(writer)),
        }
    }
}

impl<W: RecordWriter> Sink for FileSink<W> {
    fn kind(&self) -> SinkKind {
        SinkKind::File
    }

    fn emit(&self, mut record: LogRecord) {
        prepare_record(&mut record);

        let mut guard = self.writer.lock();
        let Some(writer) = guard.as_mut() else {
            return;
        };
        if let Err(err) = writer.write_record(&record) {
            tracing::warn!(logger = %record.logger, error = %err, "log file write failed");
        }
    }

    fn flush(&self) {
        if let Some(writer) = self.writer.lock().as_mut() {
            if let Err(err) = writer.flush() {
                tracing::warn!(error = %err, "log file flush failed");
            }
        }
    }

    fn close(&self) {
        if let Some(mut writer) = self.writer.lock().take() {
            if let Err(err) = writer.close() {
                tracing::warn!(error = %err, "log file close failed");
            }
        }
    }
}
