//! Diagnostics sink for non-fatal validation failures
//!
//! Setters that receive incompatible shapes or counts warn through the
//! sink held by the instance and leave prior state unchanged. The
//! default sink forwards to the `log` facade; tests inject
//! [`CaptureSink`] to assert on the emitted messages deterministically.

use std::sync::{Arc, Mutex};

/// Receiver for warnings emitted by setters and other non-fatal paths.
pub trait DiagnosticsSink: Send + Sync {
    fn warn(&self, message: &str);
}

/// Default sink: forwards warnings to `log::warn!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn warn(&self, message: &str) {
        log::warn!("{}", message);
    }
}

/// Sink that records every warning for later inspection.
#[derive(Debug, Default)]
pub struct CaptureSink {
    messages: Mutex<Vec<String>>,
}

impl CaptureSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Messages recorded so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_empty()
    }
}

impl DiagnosticsSink for CaptureSink {
    fn warn(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message.to_string());
    }
}
