use super::prompts::{COOPERATIVE_USER_PROMPT, FORCED_USER_PROMPT};
use super::tool_types::TOOL_LOOP_HARD_CAP;
use crate::core::providers::types::ToolChoice;
use crate::core::tools::SUBMIT_SUMMARY;
use serde::Serialize;

/// Default step budget for a forced attempt.
pub const FORCED_MAX_STEPS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GenerationMode {
    Cooperative,
    Forced,
}

/// How one attempt is driven: what the model is told, which tools it may
/// pick, and when the session stops.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationPolicy {
    pub mode: GenerationMode,
    pub user_prompt: String,
    pub tool_choice: ToolChoice,
    /// Stop after the step in which this tool succeeds.
    pub halt_on_tool: Option<&'static str>,
    pub max_steps: u32,
}

impl GenerationPolicy {
    /// First attempt. The model may read the inbox and chat freely; the
    /// session ends on submission, on a tool-free reply, or at the hard cap.
    pub fn cooperative() -> Self {
        Self {
            mode: GenerationMode::Cooperative,
            user_prompt: COOPERATIVE_USER_PROMPT.to_string(),
            tool_choice: ToolChoice::Auto,
            halt_on_tool: Some(SUBMIT_SUMMARY),
            max_steps: TOOL_LOOP_HARD_CAP,
        }
    }

    /// Retry attempt. Only `submitSummary` may be called, within `max_steps`.
    pub fn forced(max_steps: u32) -> Self {
        Self {
            mode: GenerationMode::Forced,
            user_prompt: FORCED_USER_PROMPT.to_string(),
            tool_choice: ToolChoice::only(SUBMIT_SUMMARY),
            halt_on_tool: Some(SUBMIT_SUMMARY),
            max_steps: max_steps.clamp(1, TOOL_LOOP_HARD_CAP),
        }
    }

    pub fn with_user_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.user_prompt = prompt.into();
        self
    }

    /// Attempt 1 is cooperative, every later attempt is forced.
    pub fn for_attempt(attempt: u32, forced_max_steps: u32) -> Self {
        if attempt <= 1 {
            Self::cooperative()
        } else {
            Self::forced(forced_max_steps)
        }
    }
}
