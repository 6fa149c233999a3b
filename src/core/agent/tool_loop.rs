use crate::core::providers::traits::{ChatRequest, Provider};
use crate::core::providers::types::{ProviderMessage, ProviderResponse};
use crate::core::tools::registry::ToolRegistry;
use crate::core::tools::traits::{ToolResult, ToolSpec};
use crate::error::{SummarizeError, ToolError};
use crate::runtime::observability::{Observer, ObserverEvent, ObserverMetric};
use std::sync::Arc;
use std::time::Instant;

use super::tool_types::{Step, StepTrace, TOOL_LOOP_HARD_CAP, ToolInvocation};

pub use super::tool_types::{LoopStopReason, ToolLoop, ToolLoopResult, ToolLoopRunParams};

impl ToolLoop {
    pub fn new(registry: Arc<ToolRegistry>, observer: Arc<dyn Observer>) -> Self {
        Self { registry, observer }
    }

    /// Drive one attempt until the policy says stop.
    ///
    /// Backend failures and email-source failures abort the attempt with an
    /// error; any other tool failure is reported back to the model.
    pub async fn run(&self, params: ToolLoopRunParams<'_>) -> Result<ToolLoopResult, SummarizeError> {
        let ToolLoopRunParams {
            provider,
            system_prompt,
            policy,
            model,
            temperature,
            attempt,
            conversation_history,
        } = params;
        let tool_specs: Vec<ToolSpec> = self.registry.specs();
        let max_steps = policy.max_steps.min(TOOL_LOOP_HARD_CAP);

        let mut messages = Vec::with_capacity(conversation_history.len() + 1);
        messages.extend_from_slice(conversation_history);
        messages.push(ProviderMessage::user(policy.user_prompt.as_str()));

        let mut trace = StepTrace::new(attempt, policy.mode);
        let mut token_sum = 0_u64;
        let mut saw_tokens = false;
        let mut step_index = 0_u32;

        let stop_reason = loop {
            if step_index >= max_steps {
                break LoopStopReason::MaxSteps;
            }
            step_index = step_index.saturating_add(1);

            let started = Instant::now();
            let response = provider
                .chat_with_tools(ChatRequest {
                    system_prompt: Some(system_prompt),
                    messages: &messages,
                    tools: &tool_specs,
                    tool_choice: &policy.tool_choice,
                    model,
                    temperature,
                })
                .await
                .map_err(|error| {
                    self.observer.record_event(&ObserverEvent::Error {
                        component: provider.name().to_string(),
                        message: error.to_string(),
                    });
                    SummarizeError::Backend(error)
                })?;
            self.observer
                .record_metric(&ObserverMetric::RequestLatency(started.elapsed()));

            if let Some(tokens) = response.total_tokens() {
                token_sum = token_sum.saturating_add(tokens);
                saw_tokens = true;
                self.observer.record_metric(&ObserverMetric::TokensUsed(tokens));
            }

            messages.push(response.to_assistant_message());
            let step = self
                .execute_tool_uses(&response, step_index, &mut messages)
                .await?;

            self.observer.record_event(&ObserverEvent::Step {
                attempt,
                step: step_index,
                tool_calls: step.invocations.len(),
            });

            let halted = policy.halt_on_tool.is_some_and(|halt| {
                step.invocations
                    .iter()
                    .any(|call| call.name == halt && call.result.success)
            });
            let idle = step.invocations.is_empty();
            trace.steps.push(step);

            if halted {
                break LoopStopReason::Submitted;
            }
            if idle {
                break LoopStopReason::Completed;
            }
        };

        self.observer.record_event(&ObserverEvent::AttemptEnd {
            attempt,
            stop_reason: stop_reason.to_string(),
        });

        Ok(ToolLoopResult {
            trace,
            messages,
            tokens_used: saw_tokens.then_some(token_sum),
            stop_reason,
        })
    }

    async fn execute_tool_uses(
        &self,
        response: &ProviderResponse,
        step_index: u32,
        messages: &mut Vec<ProviderMessage>,
    ) -> Result<Step, SummarizeError> {
        let mut invocations = Vec::new();

        for (id, name, input) in response.tool_use_blocks() {
            let started = Instant::now();
            let result = match self.registry.execute(name, input.clone()).await {
                Ok(result) => result,
                Err(ToolError::Source(error)) => {
                    self.observer.record_event(&ObserverEvent::Error {
                        component: name.to_string(),
                        message: error.to_string(),
                    });
                    return Err(SummarizeError::SourceUnavailable(error));
                }
                Err(error) => ToolResult::failed(error.to_string()),
            };
            self.observer.record_event(&ObserverEvent::ToolCall {
                tool: name.to_string(),
                duration: started.elapsed(),
                success: result.success,
            });

            messages.push(ProviderMessage::tool_result(
                id,
                result.content(),
                !result.success,
            ));
            invocations.push(ToolInvocation {
                name: name.to_string(),
                input: input.clone(),
                result,
            });
        }

        Ok(Step {
            index: step_index,
            text: response.text.clone(),
            invocations,
        })
    }
}
