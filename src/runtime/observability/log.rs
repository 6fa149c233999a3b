use super::recording::event_kind;
use super::traits::{Observer, ObserverEvent, ObserverMetric};
use tracing::{info, warn};

/// Renders observer events as `tracing` events.
pub struct LogObserver;

impl LogObserver {
    pub fn new() -> Self {
        Self
    }
}

fn millis(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl Observer for LogObserver {
    fn record_event(&self, event: &ObserverEvent) {
        let kind = event_kind(event);
        match event {
            ObserverEvent::SummarizeStart { provider, model } => {
                info!(provider = %provider, model = %model, "{kind}");
            }
            ObserverEvent::AttemptStart { attempt, mode } => {
                info!(attempt, mode = %mode, "{kind}");
            }
            ObserverEvent::Step {
                attempt,
                step,
                tool_calls,
            } => {
                info!(attempt, step, tool_calls, "{kind}");
            }
            ObserverEvent::ToolCall {
                tool,
                duration,
                success,
            } => {
                info!(tool = %tool, duration_ms = millis(*duration), success, "{kind}");
            }
            ObserverEvent::EmailsFetched {
                source,
                count,
                from_cache,
            } => {
                info!(source = %source, count, from_cache, "{kind}");
            }
            ObserverEvent::SubmissionRejected {
                attempt,
                step,
                reason,
            } => {
                warn!(attempt, step, reason = %reason, "{kind}");
            }
            ObserverEvent::AttemptEnd {
                attempt,
                stop_reason,
            } => {
                info!(attempt, stop_reason = %stop_reason, "{kind}");
            }
            ObserverEvent::UnreadCountMismatch { reported, fetched } => {
                warn!(reported, fetched, "{kind}");
            }
            ObserverEvent::SummarizeEnd {
                duration,
                attempts,
                success,
                tokens_used,
            } => {
                info!(
                    duration_ms = millis(*duration),
                    attempts,
                    success,
                    tokens = ?tokens_used,
                    "{kind}"
                );
            }
            ObserverEvent::Error { component, message } => {
                warn!(component = %component, error = %message, "{kind}");
            }
        }
    }

    fn record_metric(&self, metric: &ObserverMetric) {
        match metric {
            ObserverMetric::RequestLatency(d) => {
                info!(latency_ms = millis(*d), "metric.request_latency");
            }
            ObserverMetric::TokensUsed(t) => {
                info!(tokens = t, "metric.tokens_used");
            }
        }
    }

    fn name(&self) -> &str {
        "log"
    }
}
