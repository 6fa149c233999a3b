use crate::error::SourceError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// One unread message as the summarizer sees it. Never mutated after fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub id: String,
    pub from: String,
    pub subject: String,
    pub date: String,
    pub snippet: String,
}

/// Upstream mailbox. Results keep the source's own ordering and never
/// exceed `max_results` entries.
pub trait EmailSource: Send + Sync {
    /// Source identifier (e.g. "gmail").
    fn name(&self) -> &str;

    fn fetch<'a>(
        &'a self,
        query: &'a str,
        max_results: u32,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<EmailMessage>, SourceError>> + Send + 'a>>;
}
