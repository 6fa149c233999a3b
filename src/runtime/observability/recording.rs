use super::traits::{Observer, ObserverEvent, ObserverMetric};
use std::sync::Mutex;

/// Keeps every event in arrival order so callers can assert on sequencing.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObserverEvent>>,
    metrics: Mutex<Vec<ObserverMetric>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ObserverEvent> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn metrics(&self) -> Vec<ObserverMetric> {
        self.metrics
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Compact `kind` labels for order assertions (`"attempt.start"`, ...).
    pub fn event_kinds(&self) -> Vec<&'static str> {
        self.events().iter().map(event_kind).collect()
    }
}

pub fn event_kind(event: &ObserverEvent) -> &'static str {
    match event {
        ObserverEvent::SummarizeStart { .. } => "summarize.start",
        ObserverEvent::AttemptStart { .. } => "attempt.start",
        ObserverEvent::Step { .. } => "step",
        ObserverEvent::ToolCall { .. } => "tool.call",
        ObserverEvent::EmailsFetched { .. } => "emails.fetched",
        ObserverEvent::SubmissionRejected { .. } => "submission.rejected",
        ObserverEvent::AttemptEnd { .. } => "attempt.end",
        ObserverEvent::UnreadCountMismatch { .. } => "unread_count.mismatch",
        ObserverEvent::SummarizeEnd { .. } => "summarize.end",
        ObserverEvent::Error { .. } => "error",
    }
}

impl Observer for RecordingObserver {
    fn record_event(&self, event: &ObserverEvent) {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(event.clone());
    }

    fn record_metric(&self, metric: &ObserverMetric) {
        self.metrics
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(metric.clone());
    }

    fn name(&self) -> &str {
        "recording"
    }
}
