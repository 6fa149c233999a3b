use crate::core::mail::{EmailMessage, EmailSource};
use crate::core::providers::traits::{ChatRequest, Provider};
use crate::core::providers::types::{ContentBlock, ProviderResponse, ToolChoice};
use crate::error::SourceError;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// What the driver sent on one turn.
#[derive(Debug, Clone)]
pub(crate) struct SeenRequest {
    pub(crate) tool_choice: ToolChoice,
    pub(crate) message_count: usize,
    pub(crate) last_user_text: Option<String>,
}

/// Replays canned turns in order; once exhausted, answers with plain text.
pub(crate) struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<ProviderResponse, String>>>,
    seen: Mutex<Vec<SeenRequest>>,
}

impl ScriptedProvider {
    pub(crate) fn new(responses: Vec<ProviderResponse>) -> Self {
        Self::with_results(responses.into_iter().map(Ok).collect())
    }

    pub(crate) fn with_results(responses: Vec<Result<ProviderResponse, String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn seen(&self) -> Vec<SeenRequest> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn chat_with_tools<'a>(
        &'a self,
        request: ChatRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ProviderResponse>> + Send + 'a>> {
        Box::pin(async move {
            let last_user_text = request.messages.iter().rev().find_map(|message| {
                message.content.iter().find_map(|block| match block {
                    ContentBlock::Text { text } => Some(text.clone()),
                    _ => None,
                })
            });
            self.seen
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(SeenRequest {
                    tool_choice: request.tool_choice.clone(),
                    message_count: request.messages.len(),
                    last_user_text,
                });

            let next = self
                .responses
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front();
            match next {
                Some(Ok(response)) => Ok(response),
                Some(Err(message)) => Err(anyhow::anyhow!(message)),
                None => Ok(ProviderResponse::text_only("nothing more to add".into())),
            }
        })
    }
}

/// Inbox that counts how often it is read.
pub(crate) struct CountingSource {
    emails: Vec<EmailMessage>,
    calls: AtomicUsize,
    failure: Option<String>,
}

impl CountingSource {
    pub(crate) fn new(emails: Vec<EmailMessage>) -> Self {
        Self {
            emails,
            calls: AtomicUsize::new(0),
            failure: None,
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            emails: Vec::new(),
            calls: AtomicUsize::new(0),
            failure: Some(message.to_string()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EmailSource for CountingSource {
    fn name(&self) -> &str {
        "counting"
    }

    fn fetch<'a>(
        &'a self,
        _query: &'a str,
        max_results: u32,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<EmailMessage>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(message) = &self.failure {
                return Err(SourceError::Unreachable(message.clone()));
            }
            let limit = usize::try_from(max_results).unwrap_or(usize::MAX);
            Ok(self.emails.iter().take(limit).cloned().collect())
        })
    }
}

pub(crate) fn email(id: &str, from: &str, subject: &str) -> EmailMessage {
    EmailMessage {
        id: id.to_string(),
        from: from.to_string(),
        subject: subject.to_string(),
        date: "Mon, 19 Oct 2026 06:30:00 +0000".to_string(),
        snippet: format!("About {subject}"),
    }
}

pub(crate) fn summary_payload(unread_count: u32, important: usize) -> Value {
    let important: Vec<Value> = (0..important)
        .map(|i| {
            json!({
                "from": format!("sender{i}@example.com"),
                "subject": format!("Item {i}"),
                "whyImportant": "Deadline today",
                "suggestedAction": "Reply before noon"
            })
        })
        .collect();
    json!({
        "unreadCount": unread_count,
        "headline": "A calm morning inbox",
        "important": important,
        "quickHits": [],
        "speakable": "Good morning. Nothing urgent today."
    })
}

pub(crate) fn fetch_turn() -> ProviderResponse {
    ProviderResponse::tool_calls([("getUnreadEmails", json!({}))])
}

pub(crate) fn submit_turn(payload: Value) -> ProviderResponse {
    ProviderResponse::tool_calls([("submitSummary", payload)])
}
