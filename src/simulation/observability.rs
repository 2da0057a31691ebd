//! Observability sink: the domain-facing event log and alert buffer
//!
//! This is presentation state, not diagnostics: the dashboard reads the
//! recent window of entries and the rolling alert list. Diagnostic logging
//! goes through the `log` crate instead. Emission never fails and never
//! panics.

use std::collections::VecDeque;

use super::types::{LogCategory, ALERT_RETENTION};

/// A timestamped, categorized log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub message: String,
    pub category: LogCategory,
    pub tick: u64,
}

/// Accumulates log entries and a rolling alert list for display
#[derive(Debug, Clone, Default)]
pub struct ObservabilitySink {
    events: Vec<LogEntry>,
    alerts: VecDeque<String>,
}

impl ObservabilitySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a log entry
    ///
    /// Storage is unbounded; consumers window their reads via
    /// `recent_events`.
    pub fn log_event(&mut self, message: impl Into<String>, category: LogCategory, tick: u64) {
        self.events.push(LogEntry {
            message: message.into(),
            category,
            tick,
        });
    }

    /// Prepend an alert, keeping only the most recent `ALERT_RETENTION`
    pub fn log_alert(&mut self, message: impl Into<String>) {
        self.alerts.push_front(message.into());
        self.alerts.truncate(ALERT_RETENTION);
    }

    /// The most recent `n` log entries, oldest first
    pub fn recent_events(&self, n: usize) -> &[LogEntry] {
        let start = self.events.len().saturating_sub(n);
        &self.events[start..]
    }

    /// All log entries, oldest first
    pub fn events(&self) -> &[LogEntry] {
        &self.events
    }

    /// Current alerts, newest first
    pub fn alerts(&self) -> impl Iterator<Item = &str> {
        self.alerts.iter().map(String::as_str)
    }

    pub fn alert_count(&self) -> usize {
        self.alerts.len()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Drop all accumulated entries and alerts
    pub fn clear(&mut self) {
        self.events.clear();
        self.alerts.clear();
    }
}
