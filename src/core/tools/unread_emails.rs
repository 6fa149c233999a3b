use super::GET_UNREAD_EMAILS;
use super::traits::{Tool, ToolResult};
use crate::core::mail::{EmailMessage, EmailSource};
use crate::error::{SourceError, ToolError};
use crate::runtime::observability::{Observer, ObserverEvent};
use serde_json::{Value, json};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Reads the inbox through the configured source, at most once per
/// summarization. Later calls (including on a retry attempt) are served
/// from the cache without touching the source.
pub struct GetUnreadEmailsTool {
    source: Arc<dyn EmailSource>,
    query: String,
    max_results: u32,
    cache: OnceCell<Vec<EmailMessage>>,
    observer: Arc<dyn Observer>,
}

impl GetUnreadEmailsTool {
    pub fn new(
        source: Arc<dyn EmailSource>,
        query: impl Into<String>,
        max_results: u32,
        observer: Arc<dyn Observer>,
    ) -> Self {
        Self {
            source,
            query: query.into(),
            max_results,
            cache: OnceCell::new(),
            observer,
        }
    }

    /// The cached inbox, if the source has already been read.
    pub fn cached(&self) -> Option<&[EmailMessage]> {
        self.cache.get().map(Vec::as_slice)
    }

    /// Fetch (or reuse) the inbox. A failed fetch leaves the cache empty.
    pub async fn emails(&self) -> Result<&[EmailMessage], SourceError> {
        let from_cache = self.cache.initialized();
        let emails = self
            .cache
            .get_or_try_init(|| async {
                self.source.fetch(&self.query, self.max_results).await
            })
            .await?;

        self.observer.record_event(&ObserverEvent::EmailsFetched {
            source: self.source.name().to_string(),
            count: emails.len(),
            from_cache,
        });
        Ok(emails.as_slice())
    }
}

impl Tool for GetUnreadEmailsTool {
    fn name(&self) -> &str {
        GET_UNREAD_EMAILS
    }

    fn description(&self) -> &str {
        "Fetch the user's unread emails from the last two days. Takes no arguments."
    }

    fn parameters_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    fn execute<'a>(
        &'a self,
        _args: Value,
    ) -> Pin<Box<dyn Future<Output = Result<ToolResult, ToolError>> + Send + 'a>> {
        Box::pin(async move {
            let emails = self.emails().await?;
            Ok(ToolResult::ok(json!({ "emails": emails }).to_string()))
        })
    }
}
