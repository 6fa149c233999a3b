use crate::core::agent::GenerationMode;
use std::time::Duration;

/// Events the observer can record
#[derive(Debug, Clone, PartialEq)]
pub enum ObserverEvent {
    SummarizeStart {
        provider: String,
        model: String,
    },
    AttemptStart {
        attempt: u32,
        mode: GenerationMode,
    },
    /// One model turn finished; `tool_calls` is how many invocations it carried.
    Step {
        attempt: u32,
        step: u32,
        tool_calls: usize,
    },
    ToolCall {
        tool: String,
        duration: Duration,
        success: bool,
    },
    EmailsFetched {
        source: String,
        count: usize,
        from_cache: bool,
    },
    SubmissionRejected {
        attempt: u32,
        step: u32,
        reason: String,
    },
    AttemptEnd {
        attempt: u32,
        stop_reason: String,
    },
    /// The model's `unreadCount` disagrees with what the source returned.
    UnreadCountMismatch {
        reported: u32,
        fetched: usize,
    },
    SummarizeEnd {
        duration: Duration,
        attempts: u32,
        success: bool,
        tokens_used: Option<u64>,
    },
    Error {
        component: String,
        message: String,
    },
}

/// Numeric metrics
#[derive(Debug, Clone, PartialEq)]
pub enum ObserverMetric {
    RequestLatency(Duration),
    TokensUsed(u64),
}

/// Sink for summarizer events and metrics.
pub trait Observer: Send + Sync {
    /// Record a discrete event
    fn record_event(&self, event: &ObserverEvent);

    /// Record a numeric metric
    fn record_metric(&self, metric: &ObserverMetric);

    /// Flush any buffered data (no-op for most backends)
    fn flush(&self) {}

    /// Human-readable name of this observer
    fn name(&self) -> &str;
}
