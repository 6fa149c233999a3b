use super::types::{ProviderMessage, ProviderResponse, ToolChoice};
use crate::core::tools::traits::ToolSpec;
use std::future::Future;
use std::pin::Pin;

/// One model turn: everything the backend needs to produce the next step.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub system_prompt: Option<&'a str>,
    pub messages: &'a [ProviderMessage],
    pub tools: &'a [ToolSpec],
    pub tool_choice: &'a ToolChoice,
    pub model: &'a str,
    pub temperature: f64,
}

/// Generative model backend. Implementations perform a single round trip;
/// the tool loop composes round trips into a step trace.
pub trait Provider: Send + Sync {
    /// Provider identifier (e.g. "gemini").
    fn name(&self) -> &str;

    fn chat_with_tools<'a>(
        &'a self,
        request: ChatRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ProviderResponse>> + Send + 'a>>;
}
