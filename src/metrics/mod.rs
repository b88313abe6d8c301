use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Counters accumulated by the page runtime.
#[derive(Debug, Default, Clone)]
pub struct RuntimeMetrics {
    events: u64,
    ticks: u64,
    slide_changes: u64,
    dialogs_opened: u64,
}

impl RuntimeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self) {
        self.events = self.events.saturating_add(1);
    }

    pub fn record_tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    pub fn record_slide_changes(&mut self, count: u64) {
        self.slide_changes = self.slide_changes.saturating_add(count);
    }

    pub fn record_dialog(&mut self) {
        self.dialogs_opened = self.dialogs_opened.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            events: self.events,
            ticks: self.ticks,
            slide_changes: self.slide_changes,
            dialogs_opened: self.dialogs_opened,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub events: u64,
    pub ticks: u64,
    pub slide_changes: u64,
    pub dialogs_opened: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "runtime_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("events".to_string(), json!(self.events));
        map.insert("ticks".to_string(), json!(self.ticks));
        map.insert("slide_changes".to_string(), json!(self.slide_changes));
        map.insert("dialogs_opened".to_string(), json!(self.dialogs_opened));
        map
    }
}
