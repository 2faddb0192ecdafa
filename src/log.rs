//! Structured event sink collaborator.
//!
//! The core treats logging as an external, opaque writer: it emits named
//! events with variadic fields and never inspects what the sink does with
//! them. [`TracingLogSink`] is the default, forwarding directly to
//! `tracing`'s structured macros.

use std::fmt::Display;

/// Severity of a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Fine-grained internal detail (per-sweep summaries).
    Debug,
    /// Noteworthy lifecycle event (delete, flush).
    Info,
    /// A swallowed error the caller should be able to see.
    Warn,
}

/// Opaque structured-event writer.
///
/// Implementations must not block for long or panic: the core calls `emit`
/// outside of any of its own locks, but a slow or panicking sink still stalls
/// or aborts the caller that triggered the event.
pub trait LogSink: Send + Sync {
    /// Emit one event with a set of `(name, value)` fields.
    fn emit(&self, level: LogLevel, event: &str, fields: &[(&str, &dyn Display)]);
}

/// Default [`LogSink`] forwarding to the `tracing` ecosystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn emit(&self, level: LogLevel, event: &str, fields: &[(&str, &dyn Display)]) {
        let rendered: Vec<String> = fields
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        let joined = rendered.join(" ");
        match level {
            LogLevel::Debug => tracing::debug!(%event, fields = %joined, "cache event"),
            LogLevel::Info => tracing::info!(%event, fields = %joined, "cache event"),
            LogLevel::Warn => tracing::warn!(%event, fields = %joined, "cache event"),
        }
    }
}
