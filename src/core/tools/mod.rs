pub mod registry;
pub mod submit_summary;
pub mod traits;
pub mod unread_emails;

pub use registry::ToolRegistry;
pub use submit_summary::SubmitSummaryTool;
pub use traits::{Tool, ToolResult, ToolSpec};
pub use unread_emails::GetUnreadEmailsTool;

pub const GET_UNREAD_EMAILS: &str = "getUnreadEmails";
pub const SUBMIT_SUMMARY: &str = "submitSummary";
