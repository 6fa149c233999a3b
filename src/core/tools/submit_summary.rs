use super::SUBMIT_SUMMARY;
use super::traits::{Tool, ToolResult};
use crate::core::summary::CallSummary;
use crate::error::ToolError;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;

/// The only way the model hands back its answer. Checks the payload shape
/// only; a malformed payload comes back to the model as a failed call so it
/// can resubmit. The input is kept in the step trace either way.
pub struct SubmitSummaryTool;

impl Tool for SubmitSummaryTool {
    fn name(&self) -> &str {
        SUBMIT_SUMMARY
    }

    fn description(&self) -> &str {
        "Submit the final inbox summary for the phone call. Call exactly once when done."
    }

    fn parameters_schema(&self) -> Value {
        CallSummary::parameters_schema()
    }

    fn execute<'a>(
        &'a self,
        args: Value,
    ) -> Pin<Box<dyn Future<Output = Result<ToolResult, ToolError>> + Send + 'a>> {
        Box::pin(async move {
            CallSummary::from_submission(&args).map_err(|reason| ToolError::InvalidArguments {
                name: SUBMIT_SUMMARY.to_string(),
                message: reason.to_string(),
            })?;
            Ok(ToolResult::ok(r#"{"ok":true}"#))
        })
    }
}
