use crate::error::ToolError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Result of a tool execution, as fed back to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
}

impl ToolResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(error.into()),
        }
    }

    /// Text sent back to the model as the tool result content.
    pub fn content(&self) -> String {
        match &self.error {
            Some(error) if !self.success => format!("Error: {error}"),
            _ => self.output.clone(),
        }
    }
}

/// Description of a tool for the LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// A capability the model may invoke during a session.
pub trait Tool: Send + Sync {
    /// Tool name (used in LLM function calling)
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str;

    /// JSON schema for parameters
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with given arguments. The tool loop aborts the
    /// session on `ToolError::Source`; any other error goes back to the
    /// model as a failed result.
    fn execute<'a>(
        &'a self,
        args: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<ToolResult, ToolError>> + Send + 'a>>;

    /// Get the full spec for LLM registration
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ToolResult;

    #[test]
    fn failed_result_content_carries_error() {
        let result = ToolResult::failed("boom");
        assert!(!result.success);
        assert_eq!(result.content(), "Error: boom");
    }

    #[test]
    fn ok_result_content_is_output() {
        assert_eq!(ToolResult::ok("{\"emails\":[]}").content(), "{\"emails\":[]}");
    }
}
