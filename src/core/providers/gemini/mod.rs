//! Google Gemini provider (`generateContent` with function calling).
//!
//! Authentication: explicit key from config, else `GEMINI_API_KEY`,
//! `GOOGLE_GENERATIVE_AI_API_KEY` or `GOOGLE_API_KEY`.

use crate::core::providers::{
    build_provider_client, sanitize_api_error, scrub_secret_patterns,
    traits::{ChatRequest, Provider},
    types::{ContentBlock, MessageRole, ProviderMessage, ProviderResponse, StopReason, ToolChoice},
};
use crate::core::tools::traits::ToolSpec;
use reqwest::Client;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

mod types;
use types::{
    Candidate, Content, FunctionCallingConfig, GeminiFunctionCall, GeminiFunctionDeclaration,
    GeminiFunctionResponse, GeminiTool, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, Part, ResponsePart, ToolConfig,
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const MAX_OUTPUT_TOKENS: u32 = 8192;

const API_KEY_ENV_VARS: [&str; 3] = [
    "GEMINI_API_KEY",
    "GOOGLE_GENERATIVE_AI_API_KEY",
    "GOOGLE_API_KEY",
];

pub struct GeminiProvider {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider. An explicit key wins over the environment.
    pub fn new(api_key: Option<&str>) -> Self {
        let resolved_key = api_key
            .filter(|key| !key.is_empty())
            .map(String::from)
            .or_else(|| {
                API_KEY_ENV_VARS
                    .iter()
                    .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
            });

        Self {
            api_key: resolved_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            client: build_provider_client(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn model_name(model: &str) -> String {
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        }
    }

    fn api_key(&self) -> anyhow::Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "Gemini API key not found. Options:\n\
                 1. Set GEMINI_API_KEY env var\n\
                 2. Set model.api_key in ~/.dailycall/config.toml\n\
                 3. Get an API key from https://aistudio.google.com/app/apikey"
            )
        })
    }

    fn build_gemini_tools(tools: &[ToolSpec]) -> Option<Vec<GeminiTool>> {
        if tools.is_empty() {
            return None;
        }
        let function_declarations = tools
            .iter()
            .map(|tool| GeminiFunctionDeclaration {
                name: tool.name.clone(),
                description: scrub_secret_patterns(&tool.description).into_owned(),
                // Gemini rejects OBJECT schemas with no properties; omit them.
                parameters: tool
                    .parameters
                    .get("properties")
                    .and_then(Value::as_object)
                    .filter(|props| !props.is_empty())
                    .map(|_| tool.parameters.clone()),
            })
            .collect();
        Some(vec![GeminiTool {
            function_declarations,
        }])
    }

    fn build_tool_config(tool_choice: &ToolChoice, has_tools: bool) -> Option<ToolConfig> {
        if !has_tools {
            return None;
        }
        let function_calling_config = match tool_choice {
            ToolChoice::Auto => FunctionCallingConfig {
                mode: "AUTO",
                allowed_function_names: None,
            },
            ToolChoice::Only(name) => FunctionCallingConfig {
                mode: "ANY",
                allowed_function_names: Some(vec![name.clone()]),
            },
        };
        Some(ToolConfig {
            function_calling_config,
        })
    }

    fn map_provider_message(
        provider_message: &ProviderMessage,
        tool_id_to_name: &HashMap<String, String>,
    ) -> Content {
        let role = match provider_message.role {
            MessageRole::Assistant => "model",
            MessageRole::User => "user",
        }
        .to_string();

        let parts = provider_message
            .content
            .iter()
            .map(|block| match block {
                ContentBlock::Text { text } => Part::text(scrub_secret_patterns(text).into_owned()),
                ContentBlock::ToolUse { id, name, input } => Part::function_call(GeminiFunctionCall {
                    name: name.clone(),
                    args: wrap_object(input),
                    id: Some(id.clone()),
                }),
                ContentBlock::ToolResult {
                    tool_use_id,
                    content,
                    is_error,
                } => {
                    let tool_name = tool_id_to_name
                        .get(tool_use_id)
                        .cloned()
                        .unwrap_or_else(|| "tool".to_string());
                    Part::function_response(GeminiFunctionResponse {
                        name: tool_name,
                        response: serde_json::json!({
                            "tool_use_id": tool_use_id,
                            "content": content,
                            "is_error": is_error,
                        }),
                    })
                }
            })
            .collect();

        Content {
            role: Some(role),
            parts,
        }
    }

    fn build_tools_request(request: &ChatRequest<'_>) -> GenerateContentRequest {
        let tool_id_to_name = request
            .messages
            .iter()
            .flat_map(|message| message.content.iter())
            .filter_map(|block| match block {
                ContentBlock::ToolUse { id, name, .. } => Some((id.clone(), name.clone())),
                ContentBlock::Text { .. } | ContentBlock::ToolResult { .. } => None,
            })
            .collect::<HashMap<_, _>>();

        GenerateContentRequest {
            contents: request
                .messages
                .iter()
                .map(|message| Self::map_provider_message(message, &tool_id_to_name))
                .collect(),
            system_instruction: request.system_prompt.map(|system| Content {
                role: None,
                parts: vec![Part::text(system.to_string())],
            }),
            tools: Self::build_gemini_tools(request.tools),
            tool_config: Self::build_tool_config(request.tool_choice, !request.tools.is_empty()),
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }

    fn map_stop_reason(candidate: &Candidate) -> StopReason {
        if candidate
            .content
            .parts
            .iter()
            .any(|part| part.function_call.is_some())
        {
            return StopReason::ToolUse;
        }

        match candidate.finish_reason.as_deref() {
            Some("STOP") => StopReason::EndTurn,
            Some("MAX_TOKENS") => StopReason::MaxTokens,
            Some(_) | None => StopReason::Error,
        }
    }

    fn parse_content_blocks(parts: &[ResponsePart]) -> Vec<ContentBlock> {
        let mut tool_call_index = 1usize;
        let mut blocks = Vec::new();

        for part in parts {
            if let Some(text) = &part.text
                && !text.is_empty()
            {
                blocks.push(ContentBlock::Text { text: text.clone() });
            }

            if let Some(function_call) = &part.function_call {
                let id = function_call
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("gemini_call_{tool_call_index}"));
                tool_call_index += 1;
                blocks.push(ContentBlock::ToolUse {
                    id,
                    name: function_call.name.clone(),
                    input: wrap_object(&function_call.args),
                });
            }
        }

        blocks
    }

    fn into_provider_response(result: GenerateContentResponse) -> anyhow::Result<ProviderResponse> {
        let candidate = result
            .candidates
            .as_ref()
            .and_then(|candidates| candidates.first())
            .ok_or_else(|| anyhow::anyhow!("No response from Gemini"))?;

        let content_blocks = Self::parse_content_blocks(&candidate.content.parts);
        let text = content_blocks
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::ToolUse { .. } | ContentBlock::ToolResult { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n");
        let stop_reason = Self::map_stop_reason(candidate);

        let mut provider_response = if let Some(usage) = &result.usage_metadata {
            ProviderResponse::with_usage(
                text,
                usage.prompt_token_count,
                usage.candidates_token_count,
            )
        } else {
            ProviderResponse::text_only(text)
        };
        provider_response.content_blocks = content_blocks;
        provider_response.stop_reason = Some(stop_reason);

        if let Some(model_version) = result.model_version {
            provider_response = provider_response.with_model(model_version);
        }
        Ok(provider_response)
    }

    async fn call_api_with_request(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> anyhow::Result<GenerateContentResponse> {
        let api_key = self.api_key()?;
        let url = format!(
            "{}/{}:generateContent",
            self.base_url,
            Self::model_name(model)
        );

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({status}): {}", sanitize_api_error(&error_text));
        }

        let result: GenerateContentResponse = response.json().await?;
        if let Some(err) = result.error.as_ref() {
            anyhow::bail!("Gemini API error: {}", sanitize_api_error(&err.message));
        }
        Ok(result)
    }
}

/// Gemini function args must be JSON objects.
fn wrap_object(value: &Value) -> Value {
    if value.is_object() {
        value.clone()
    } else if value.is_null() {
        Value::Object(Map::new())
    } else {
        let mut wrapped = Map::new();
        wrapped.insert("input".to_string(), value.clone());
        Value::Object(wrapped)
    }
}

impl Part {
    fn text(text: String) -> Self {
        Self {
            text: Some(text),
            function_call: None,
            function_response: None,
        }
    }

    fn function_call(function_call: GeminiFunctionCall) -> Self {
        Self {
            text: None,
            function_call: Some(function_call),
            function_response: None,
        }
    }

    fn function_response(function_response: GeminiFunctionResponse) -> Self {
        Self {
            text: None,
            function_call: None,
            function_response: Some(function_response),
        }
    }
}

impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn chat_with_tools<'a>(
        &'a self,
        request: ChatRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ProviderResponse>> + Send + 'a>> {
        Box::pin(async move {
            let body = Self::build_tools_request(&request);
            let result = self.call_api_with_request(request.model, &body).await?;
            Self::into_provider_response(result)
        })
    }
}

#[cfg(test)]
mod tests;
