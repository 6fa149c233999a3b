pub mod controller;
pub mod policy;
pub mod prompts;
pub mod tool_loop;
mod tool_types;

#[cfg(test)]
pub(crate) mod test_support;

pub use controller::{MAX_ATTEMPTS, Summarizer, SummarizerOptions, first_valid_submission};
pub use policy::{FORCED_MAX_STEPS, GenerationMode, GenerationPolicy};
pub use tool_loop::{LoopStopReason, ToolLoop, ToolLoopResult, ToolLoopRunParams};
pub use tool_types::{Step, StepTrace, TOOL_LOOP_HARD_CAP, ToolInvocation};
