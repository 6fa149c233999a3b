use super::policy::{GenerationMode, GenerationPolicy};
use crate::core::providers::traits::Provider;
use crate::core::providers::types::ProviderMessage;
use crate::core::tools::registry::ToolRegistry;
use crate::core::tools::traits::ToolResult;
use crate::runtime::observability::Observer;
use serde::Serialize;
use std::sync::Arc;

/// Upper bound on model turns for any single session, whatever the policy says.
pub const TOOL_LOOP_HARD_CAP: u32 = 25;

pub struct ToolLoop {
    pub(crate) registry: Arc<ToolRegistry>,
    pub(crate) observer: Arc<dyn Observer>,
}

pub struct ToolLoopRunParams<'a> {
    pub provider: &'a dyn Provider,
    pub system_prompt: &'a str,
    pub policy: &'a GenerationPolicy,
    pub model: &'a str,
    pub temperature: f64,
    pub attempt: u32,
    pub conversation_history: &'a [ProviderMessage],
}

/// One capability invocation inside a step: what was asked and what came back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolInvocation {
    pub name: String,
    pub input: serde_json::Value,
    pub result: ToolResult,
}

/// One model turn. A step without invocations is a plain text reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub index: u32,
    pub text: String,
    pub invocations: Vec<ToolInvocation>,
}

/// Ordered record of one attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepTrace {
    pub attempt: u32,
    pub mode: GenerationMode,
    pub steps: Vec<Step>,
}

impl StepTrace {
    pub fn new(attempt: u32, mode: GenerationMode) -> Self {
        Self {
            attempt,
            mode,
            steps: Vec::new(),
        }
    }

    /// All invocations in step order, then invocation order.
    pub fn invocations(&self) -> impl Iterator<Item = (&Step, &ToolInvocation)> {
        self.steps
            .iter()
            .flat_map(|step| step.invocations.iter().map(move |call| (step, call)))
    }

    pub fn invocation_count(&self, name: &str) -> usize {
        self.invocations()
            .filter(|(_, call)| call.name == name)
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum LoopStopReason {
    /// The policy's halting tool was invoked and accepted.
    Submitted,
    /// The model replied without calling any tool.
    Completed,
    MaxSteps,
}

pub struct ToolLoopResult {
    pub trace: StepTrace,
    /// Full conversation, including `conversation_history`.
    pub messages: Vec<ProviderMessage>,
    pub tokens_used: Option<u64>,
    pub stop_reason: LoopStopReason,
}
