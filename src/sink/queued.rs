//! Queued file sink: many producers, one drain worker.
//!
//! # States
//! ```text
//! Draining → Restarting: a write failed, waiting out the backoff
//! Restarting → Draining: reopen + retry succeeded
//! Restarting → Failed: more than max_restarts consecutive failures
//! any → Closed: close() or drop
//! ```
//!
//! Only the drain worker touches the writer, so there is exactly one writer
//! per file however many threads emit. Records still queued when the
//! process dies are lost.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, select, Receiver, RecvTimeoutError, Sender, TrySendError};
use parking_lot::Mutex;
use serde::Serialize;

use crate::config::{OverflowPolicy, QueueConfig};
use crate::record::LogRecord;
use crate::resilience::Backoff;
use crate::sink::{prepare_record, RecordWriter, Sink, SinkKind};

const EVENT_CAPACITY: usize = 64;
const IDLE_WAIT: Duration = Duration::from_secs(2);

/// Lifecycle of the drain worker.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    Draining = 0,
    Restarting = 1,
    Failed = 2,
    Closed = 3,
}

impl From<u8> for WorkerState {
    fn from(val: u8) -> Self {
        match val {
            1 => WorkerState::Restarting,
            2 => WorkerState::Failed,
            3 => WorkerState::Closed,
            _ => WorkerState::Draining,
        }
    }
}

/// Published on the status channel returned by [`QueuedFileSink::subscribe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    WriteFailed { attempt: u32, error: String },
    Restarted { attempt: u32 },
    /// Restarts exhausted; nothing more will be written by this sink.
    GaveUp { error: String },
    Stopped { written: u64 },
}

/// Point-in-time counters. Updated without a lock, so a snapshot taken
/// while producers are running may be momentarily inconsistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub enqueued: u64,
    pub written: u64,
    pub dropped: u64,
    pub restarts: u64,
    pub pending: u64,
    pub state: WorkerState,
}

#[derive(Debug, Default)]
struct Counters {
    state: AtomicU8,
    enqueued: AtomicU64,
    written: AtomicU64,
    dropped: AtomicU64,
    /// Enqueued records that left the queue without being written.
    discarded: AtomicU64,
    restarts: AtomicU64,
}

impl Counters {
    fn state(&self) -> WorkerState {
        self.state.load(Ordering::Acquire).into()
    }

    /// Move to `to` unless the sink is already closed.
    fn advance(&self, to: WorkerState) {
        let _ = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (current != WorkerState::Closed as u8).then_some(to as u8)
            });
    }

    fn discard(&self, count: u64) {
        self.dropped.fetch_add(count, Ordering::Relaxed);
        self.discarded.fetch_add(count, Ordering::Relaxed);
    }

    fn pending(&self) -> u64 {
        let settled = self.written.load(Ordering::Relaxed) + self.discarded.load(Ordering::Relaxed);
        self.enqueued.load(Ordering::Relaxed).saturating_sub(settled)
    }
}

/// File sink whose I/O runs on a dedicated drain worker thread.
pub struct QueuedFileSink {
    name: String,
    records: Sender<LogRecord>,
    /// Second handle on the queue, used to evict under `DropOldest`.
    evict: Receiver<LogRecord>,
    /// Dropped to cancel the worker.
    shutdown: Mutex<Option<Sender<()>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    /// Set once the worker has been joined; from then on nothing drains the
    /// queue but `sweep`.
    joined: AtomicBool,
    events: Receiver<WorkerEvent>,
    counters: Arc<Counters>,
    overflow: OverflowPolicy,
    block_timeout: Duration,
}

impl QueuedFileSink {
    /// Spawn the drain worker around `writer`. The worker is draining when
    /// this returns.
    pub fn start<W: RecordWriter>(name: impl Into<String>, writer: W, config: &QueueConfig) -> io::Result<Self> {
        let name = name.into();
        let (records_tx, records_rx) = bounded(config.capacity.max(1));
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);
        let (events_tx, events_rx) = bounded(EVENT_CAPACITY);
        let counters = Arc::new(Counters::default());

        let worker = DrainWorker {
            name: name.clone(),
            writer,
            records: records_rx.clone(),
            shutdown: shutdown_rx,
            events: events_tx,
            counters: Arc::clone(&counters),
            backoff: Backoff::from_config(config),
            max_restarts: config.max_restarts,
        };
        let handle = thread::Builder::new()
            .name(format!("log-drain-{name}"))
            .spawn(move || worker.run())?;

        tracing::debug!(sink = %name, capacity = config.capacity, overflow = ?config.overflow, "drain worker started");

        Ok(Self {
            name,
            records: records_tx,
            evict: records_rx,
            shutdown: Mutex::new(Some(shutdown_tx)),
            worker: Mutex::new(Some(handle)),
            joined: AtomicBool::new(false),
            events: events_rx,
            counters,
            overflow: config.overflow,
            block_timeout: Duration::from_millis(config.block_timeout_ms),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> WorkerState {
        self.counters.state()
    }

    /// Status channel. Receivers share one stream: each event goes to one of them.
    pub fn subscribe(&self) -> Receiver<WorkerEvent> {
        self.events.clone()
    }

    pub fn stats(&self) -> QueueStats {
        QueueStats {
            enqueued: self.counters.enqueued.load(Ordering::Relaxed),
            written: self.counters.written.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
            restarts: self.counters.restarts.load(Ordering::Relaxed),
            pending: self.counters.pending(),
            state: self.counters.state(),
        }
    }

    /// Wait until every enqueued record has been written or discarded.
    /// Returns `false` on timeout or if the worker is no longer draining.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.counters.pending() == 0 {
                return true;
            }
            if matches!(self.state(), WorkerState::Failed | WorkerState::Closed) || Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    /// Stop accepting records, let the worker drain what is queued, close
    /// the writer and join the thread. Idempotent.
    pub fn close(&self) {
        let Some(signal) = self.shutdown.lock().take() else {
            return;
        };
        self.counters.advance(WorkerState::Closed);
        drop(signal);

        if let Some(handle) = self.worker.lock().take() {
            if handle.join().is_err() {
                tracing::error!(sink = %self.name, "drain worker panicked");
            }
        }

        self.joined.store(true, Ordering::SeqCst);
        let abandoned = self.sweep();
        if abandoned > 0 {
            tracing::warn!(sink = %self.name, abandoned, "records left in queue at close");
        }
    }

    /// Discard whatever is still queued.
    fn sweep(&self) -> u64 {
        let mut abandoned = 0;
        while self.evict.try_recv().is_ok() {
            abandoned += 1;
        }
        if abandoned > 0 {
            self.counters.discard(abandoned);
        }
        abandoned
    }

    fn enqueue(&self, record: LogRecord) -> bool {
        match self.overflow {
            OverflowPolicy::Block => self.records.send_timeout(record, self.block_timeout).is_ok(),
            OverflowPolicy::DropNewest => self.records.try_send(record).is_ok(),
            OverflowPolicy::DropOldest => {
                let mut record = record;
                loop {
                    match self.records.try_send(record) {
                        Ok(()) => return true,
                        Err(TrySendError::Full(rejected)) => {
                            if self.evict.try_recv().is_ok() {
                                self.counters.discard(1);
                            }
                            record = rejected;
                        }
                        Err(TrySendError::Disconnected(_)) => return false,
                    }
                }
            }
        }
    }
}

impl Sink for QueuedFileSink {
    fn kind(&self) -> SinkKind {
        SinkKind::File
    }

    fn emit(&self, mut record: LogRecord) {
        if matches!(self.state(), WorkerState::Failed | WorkerState::Closed) {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            return;
        }

        prepare_record(&mut record);
        if !self.enqueue(record) {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            return;
        }
        self.counters.enqueued.fetch_add(1, Ordering::Relaxed);

        // Raced with close(): the record may have landed after the final sweep.
        if self.joined.load(Ordering::SeqCst) {
            self.sweep();
        }
    }

    fn flush(&self) {
        if !self.wait_idle(IDLE_WAIT) {
            tracing::debug!(sink = %self.name, pending = self.counters.pending(), "flush returned with records pending");
        }
    }

    fn close(&self) {
        QueuedFileSink::close(self);
    }
}

impl Drop for QueuedFileSink {
    fn drop(&mut self) {
        self.close();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    Written,
    GaveUp,
    Cancelled,
}

struct DrainWorker<W: RecordWriter> {
    name: String,
    writer: W,
    records: Receiver<LogRecord>,
    shutdown: Receiver<()>,
    events: Sender<WorkerEvent>,
    counters: Arc<Counters>,
    backoff: Backoff,
    max_restarts: u32,
}

impl<W: RecordWriter> DrainWorker<W> {
    fn run(mut self) {
        let mut drain_rest = true;
        loop {
            let next = select! {
                recv(self.records) -> msg => msg.ok(),
                recv(self.shutdown) -> _ => None,
            };
            let Some(record) = next else {
                break;
            };
            match self.deliver(&record) {
                Delivery::Written => {}
                Delivery::GaveUp => return self.finish(),
                Delivery::Cancelled => {
                    drain_rest = false;
                    break;
                }
            }
        }

        if drain_rest {
            while let Ok(record) = self.records.try_recv() {
                if self.deliver(&record) != Delivery::Written {
                    break;
                }
            }
        }
        self.finish();
    }

    fn deliver(&mut self, record: &LogRecord) -> Delivery {
        let mut attempt = 0u32;
        loop {
            let err = match self.writer.write_record(record) {
                Ok(()) => {
                    self.counters.written.fetch_add(1, Ordering::Relaxed);
                    if attempt > 0 {
                        self.counters.advance(WorkerState::Draining);
                    }
                    return Delivery::Written;
                }
                Err(err) => err,
            };

            attempt += 1;
            let error = err.to_string();
            tracing::error!(sink = %self.name, attempt, error = %error, "log write failed");
            self.publish(WorkerEvent::WriteFailed {
                attempt,
                error: error.clone(),
            });

            if attempt > self.max_restarts {
                self.counters.advance(WorkerState::Failed);
                self.counters.discard(1);
                tracing::error!(sink = %self.name, "drain worker gave up; records for this sink are now dropped");
                self.publish(WorkerEvent::GaveUp { error });
                return Delivery::GaveUp;
            }

            self.counters.advance(WorkerState::Restarting);
            self.counters.restarts.fetch_add(1, Ordering::Relaxed);
            match self.shutdown.recv_timeout(self.backoff.delay(attempt)) {
                Err(RecvTimeoutError::Timeout) => {}
                _ => {
                    self.counters.discard(1);
                    return Delivery::Cancelled;
                }
            }

            match self.writer.reopen() {
                Ok(()) => self.publish(WorkerEvent::Restarted { attempt }),
                Err(err) => tracing::warn!(sink = %self.name, attempt, error = %err, "reopen failed"),
            }
        }
    }

    fn finish(mut self) {
        if let Err(err) = self.writer.close() {
            tracing::warn!(sink = %self.name, error = %err, "closing log writer failed");
        }
        let written = self.counters.written.load(Ordering::Relaxed);
        tracing::debug!(sink = %self.name, written, "drain worker stopped");
        self.publish(WorkerEvent::Stopped { written });
    }

    fn publish(&self, event: WorkerEvent) {
        let _ = self.events.try_send(event);
    }
}
