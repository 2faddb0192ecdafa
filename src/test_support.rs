//! Test-only helpers shared across unit and integration tests.

use std::fmt::Display;

use parking_lot::Mutex;

use crate::log::{LogLevel, LogSink};

/// A [`LogSink`] that records emitted event names instead of forwarding to
/// `tracing`, so tests can assert on what the core logged without a
/// subscriber.
#[derive(Default)]
pub struct RecordingLogSink {
    events: Mutex<Vec<String>>,
}

impl LogSink for RecordingLogSink {
    fn emit(&self, _level: LogLevel, event: &str, _fields: &[(&str, &dyn Display)]) {
        self.events.lock().push(event.to_string());
    }
}

impl RecordingLogSink {
    /// Event names recorded so far, in emission order.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }
}
