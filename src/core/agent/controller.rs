//! Attempt controller: runs up to [`MAX_ATTEMPTS`] sessions and returns
//! the first structurally valid `submitSummary` payload it finds.

use super::policy::{FORCED_MAX_STEPS, GenerationPolicy};
use super::prompts;
use super::tool_loop::{ToolLoop, ToolLoopRunParams};
use super::tool_types::StepTrace;
use crate::core::mail::{DEFAULT_MAX_RESULTS, DEFAULT_QUERY, EmailSource};
use crate::core::providers::traits::Provider;
use crate::core::providers::types::ProviderMessage;
use crate::core::summary::CallSummary;
use crate::core::tools::{GetUnreadEmailsTool, SUBMIT_SUMMARY, SubmitSummaryTool, ToolRegistry};
use crate::error::SummarizeError;
use crate::runtime::observability::{Observer, ObserverEvent};
use std::sync::Arc;
use std::time::Instant;

pub const MAX_ATTEMPTS: u32 = 2;

/// Knobs for one summarizer. Defaults match the daily job.
#[derive(Debug, Clone, PartialEq)]
pub struct SummarizerOptions {
    pub model: String,
    pub temperature: f64,
    pub query: String,
    pub max_results: u32,
    pub forced_max_steps: u32,
}

impl Default for SummarizerOptions {
    fn default() -> Self {
        Self {
            model: crate::core::providers::gemini::DEFAULT_MODEL.to_string(),
            temperature: 0.3,
            query: DEFAULT_QUERY.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            forced_max_steps: FORCED_MAX_STEPS,
        }
    }
}

pub struct Summarizer {
    provider: Arc<dyn Provider>,
    observer: Arc<dyn Observer>,
    options: SummarizerOptions,
}

impl Summarizer {
    pub fn new(
        provider: Arc<dyn Provider>,
        observer: Arc<dyn Observer>,
        options: SummarizerOptions,
    ) -> Self {
        Self {
            provider,
            observer,
            options,
        }
    }

    /// Produce a `CallSummary` for the inbox behind `source`.
    ///
    /// Each call owns a fresh email cache, so the source is read at most
    /// once per call no matter how many attempts run.
    pub async fn summarize(
        &self,
        source: Arc<dyn EmailSource>,
    ) -> Result<CallSummary, SummarizeError> {
        let started = Instant::now();
        self.observer.record_event(&ObserverEvent::SummarizeStart {
            provider: self.provider.name().to_string(),
            model: self.options.model.clone(),
        });

        let emails_tool = Arc::new(GetUnreadEmailsTool::new(
            source,
            self.options.query.clone(),
            self.options.max_results,
            Arc::clone(&self.observer),
        ));
        let mut registry = ToolRegistry::new();
        registry.register(emails_tool.clone());
        registry.register(Arc::new(SubmitSummaryTool));
        let tool_loop = ToolLoop::new(Arc::new(registry), Arc::clone(&self.observer));

        let outcome = self.run_attempts(&tool_loop, &emails_tool).await;

        let (attempts, tokens_used, result) = match outcome {
            Ok(AttemptsOutcome {
                attempts,
                tokens_used,
                summary,
            }) => {
                if let Some(emails) = emails_tool.cached()
                    && usize::try_from(summary.unread_count).ok() != Some(emails.len())
                {
                    self.observer.record_event(&ObserverEvent::UnreadCountMismatch {
                        reported: summary.unread_count,
                        fetched: emails.len(),
                    });
                }
                (attempts, tokens_used, Ok(summary))
            }
            Err(error) => (error.attempts().unwrap_or(0), None, Err(error)),
        };

        self.observer.record_event(&ObserverEvent::SummarizeEnd {
            duration: started.elapsed(),
            attempts,
            success: result.is_ok(),
            tokens_used,
        });
        self.observer.flush();
        result
    }

    async fn run_attempts(
        &self,
        tool_loop: &ToolLoop,
        emails_tool: &GetUnreadEmailsTool,
    ) -> Result<AttemptsOutcome, SummarizeError> {
        let system_prompt = prompts::system_prompt();
        let mut history: Vec<ProviderMessage> = Vec::new();
        let mut traces: Vec<StepTrace> = Vec::with_capacity(MAX_ATTEMPTS as usize);
        let mut token_sum: Option<u64> = None;

        for attempt in 1..=MAX_ATTEMPTS {
            let mut policy = GenerationPolicy::for_attempt(attempt, self.options.forced_max_steps);
            if attempt > 1 && emails_tool.cached().is_none() {
                // The forced policy cannot call getUnreadEmails, so the
                // controller reads the inbox itself, outside the model's
                // capability surface, and hands it over inline. It goes
                // through the same cached tool, so the source is still
                // queried at most once.
                let emails = emails_tool.emails().await?;
                let inlined = serde_json::json!({ "emails": emails }).to_string();
                policy = policy.with_user_prompt(prompts::forced_prompt(Some(&inlined)));
            }

            self.observer.record_event(&ObserverEvent::AttemptStart {
                attempt,
                mode: policy.mode,
            });

            let result = tool_loop
                .run(ToolLoopRunParams {
                    provider: self.provider.as_ref(),
                    system_prompt: &system_prompt,
                    policy: &policy,
                    model: &self.options.model,
                    temperature: self.options.temperature,
                    attempt,
                    conversation_history: &history,
                })
                .await?;

            if let Some(tokens) = result.tokens_used {
                token_sum = Some(token_sum.unwrap_or(0).saturating_add(tokens));
            }

            if let Some(summary) = first_valid_submission(&result.trace, self.observer.as_ref()) {
                return Ok(AttemptsOutcome {
                    attempts: attempt,
                    tokens_used: token_sum,
                    summary,
                });
            }

            history = result.messages;
            traces.push(result.trace);
        }

        Err(SummarizeError::Failed {
            attempts: MAX_ATTEMPTS,
            traces,
        })
    }
}

struct AttemptsOutcome {
    attempts: u32,
    tokens_used: Option<u64>,
    summary: CallSummary,
}

/// First `submitSummary` payload (step order, then invocation order) that
/// parses as a `CallSummary`. Rejected payloads are reported and skipped.
pub fn first_valid_submission(trace: &StepTrace, observer: &dyn Observer) -> Option<CallSummary> {
    trace
        .invocations()
        .filter(|(_, call)| call.name == SUBMIT_SUMMARY)
        .find_map(|(step, call)| match CallSummary::from_submission(&call.input) {
            Ok(summary) => Some(summary),
            Err(reason) => {
                observer.record_event(&ObserverEvent::SubmissionRejected {
                    attempt: trace.attempt,
                    step: step.index,
                    reason: reason.to_string(),
                });
                None
            }
        })
}
