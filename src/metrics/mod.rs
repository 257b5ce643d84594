use crate::layout::LayoutResult;
use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

#[derive(Debug, Default, Clone)]
pub struct LayoutMetrics {
    layouts: u64,
    placed: u64,
    preview_placed: u64,
    bends: u64,
    shifted: u64,
    truncations: u64,
    preview_stops: u64,
}

impl LayoutMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_layout(&mut self, result: &LayoutResult) {
        self.layouts = self.layouts.saturating_add(1);
        self.placed = self.placed.saturating_add(result.placed() as u64);
        self.preview_placed = self
            .preview_placed
            .saturating_add(result.preview_placed as u64);
        self.bends = self.bends.saturating_add(result.bends as u64);
        self.shifted = self.shifted.saturating_add(result.shifted as u64);
        if result.truncated {
            self.truncations = self.truncations.saturating_add(1);
        }
        if result.preview_stop.is_some() {
            self.preview_stops = self.preview_stops.saturating_add(1);
        }
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            layouts: self.layouts,
            placed: self.placed,
            preview_placed: self.preview_placed,
            bends: self.bends,
            shifted: self.shifted,
            truncations: self.truncations,
            preview_stops: self.preview_stops,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub layouts: u64,
    pub placed: u64,
    pub preview_placed: u64,
    pub bends: u64,
    pub shifted: u64,
    pub truncations: u64,
    pub preview_stops: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(
            LogLevel::Info,
            target.to_string(),
            "layout_metrics".to_string(),
            self.as_fields(),
        )
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("layouts".to_string(), json!(self.layouts));
        map.insert("placed".to_string(), json!(self.placed));
        map.insert("preview_placed".to_string(), json!(self.preview_placed));
        map.insert("bends".to_string(), json!(self.bends));
        map.insert("shifted".to_string(), json!(self.shifted));
        map.insert("truncations".to_string(), json!(self.truncations));
        map.insert("preview_stops".to_string(), json!(self.preview_stops));
        map
    }
}

pub fn snapshot_event(snapshot: &MetricSnapshot, target: &str) -> LogEvent {
    snapshot.to_log_event(target)
}
