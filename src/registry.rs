//! Sink registry.
//!
//! # Design Decisions
//! - Explicit and injectable: whoever builds loggers owns the registry and
//!   shares it through an `Arc`
//! - Keyed by `(name, SinkKind)`, so a name has at most one file sink and
//!   one console sink
//! - First-time construction runs under the map's entry lock; concurrent
//!   callers for the same key see a single sink

use std::sync::Arc;

use dashmap::DashMap;

use crate::sink::{Sink, SinkKind};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SinkKey {
    name: String,
    kind: SinkKind,
}

impl SinkKey {
    fn new(name: &str, kind: SinkKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
        }
    }
}

/// Maps `(name, kind)` to the one sink built for it.
#[derive(Default)]
pub struct SinkRegistry {
    sinks: DashMap<SinkKey, Arc<dyn Sink>>,
}

impl SinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str, kind: SinkKind) -> Option<Arc<dyn Sink>> {
        self.sinks
            .get(&SinkKey::new(name, kind))
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Return the registered sink, or build and register one.
    ///
    /// `build` runs at most once per key; if it fails nothing is registered
    /// and a later call may try again.
    pub fn get_or_try_insert_with<E>(
        &self,
        name: &str,
        kind: SinkKind,
        build: impl FnOnce() -> Result<Arc<dyn Sink>, E>,
    ) -> Result<Arc<dyn Sink>, E> {
        if let Some(sink) = self.get(name, kind) {
            return Ok(sink);
        }

        let entry = self
            .sinks
            .entry(SinkKey::new(name, kind))
            .or_try_insert_with(|| {
                let sink = build()?;
                tracing::debug!(logger = name, kind = ?kind, "registered sink");
                Ok(sink)
            })?;
        Ok(Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Flush every registered sink.
    pub fn flush_all(&self) {
        for entry in self.sinks.iter() {
            entry.value().flush();
        }
    }

    /// Close and unregister every sink. Queued sinks drain before returning.
    pub fn close_all(&self) {
        let keys: Vec<SinkKey> = self.sinks.iter().map(|entry| entry.key().clone()).collect();
        for key in keys {
            if let Some((key, sink)) = self.sinks.remove(&key) {
                sink.close();
                tracing::debug!(logger = %key.name, kind = ?key.kind, "closed sink");
            }
        }
    }
}

impl Drop for SinkRegistry {
    fn drop(&mut self) {
        self.close_all();
    }
}
