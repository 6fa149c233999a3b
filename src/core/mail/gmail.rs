//! Gmail API v1 source: unread message metadata.
//!
//! Exchanges the stored refresh token for an access token, lists the ids
//! matching the query, then fetches `From`/`Subject`/`Date` headers and the
//! snippet for each id in list order.

use super::traits::{EmailMessage, EmailSource};
use crate::error::SourceError;
use crate::core::providers::sanitize_api_error;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;

pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1";

// ============================================================================
// API response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageListResponse {
    #[serde(default)]
    messages: Vec<MessageStub>,
}

#[derive(Debug, Deserialize)]
struct MessageStub {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageDetail {
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    payload: Option<MessagePayload>,
}

#[derive(Debug, Deserialize)]
struct MessagePayload {
    #[serde(default)]
    headers: Vec<Header>,
}

#[derive(Debug, Deserialize)]
struct Header {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    value: Option<String>,
}

fn header_value(headers: &[Header], name: &str) -> String {
    headers
        .iter()
        .find(|h| h.name.as_deref().unwrap_or_default().eq_ignore_ascii_case(name))
        .and_then(|h| h.value.clone())
        .unwrap_or_default()
}

// ============================================================================
// Source
// ============================================================================

/// OAuth client + long-lived refresh token for one mailbox.
#[derive(Debug, Clone)]
pub struct GmailCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

pub struct GmailSource {
    client: Client,
    credentials: GmailCredentials,
    token_url: String,
    api_base: String,
}

impl GmailSource {
    pub fn new(client: Client, credentials: GmailCredentials) -> Self {
        Self {
            client,
            credentials,
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Point the source at different endpoints (mock servers in tests).
    pub fn with_endpoints(mut self, token_url: impl Into<String>, api_base: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    async fn access_token(&self) -> Result<String, SourceError> {
        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("refresh_token", self.credentials.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        let status = response.status();
        if matches!(status, StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED) {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::CredentialsRejected(sanitize_api_error(&body)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: sanitize_api_error(&body),
            });
        }

        let token: TokenResponse = response.json().await?;
        tracing::debug!("gmail access token refreshed");
        Ok(token.access_token)
    }

    async fn list_ids(
        &self,
        access_token: &str,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<String>, SourceError> {
        let limit = max_results.to_string();
        let response = self
            .client
            .get(format!("{}/users/me/messages", self.api_base))
            .bearer_auth(access_token)
            .query(&[("q", query), ("maxResults", limit.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::CredentialsRejected(sanitize_api_error(&body)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: sanitize_api_error(&body),
            });
        }

        let list: MessageListResponse = response.json().await?;
        Ok(list.messages.into_iter().filter_map(|m| m.id).collect())
    }

    /// `Ok(None)` when the message vanished between list and get.
    async fn message_metadata(
        &self,
        access_token: &str,
        id: &str,
    ) -> Result<Option<EmailMessage>, SourceError> {
        let response = self
            .client
            .get(format!("{}/users/me/messages/{id}", self.api_base))
            .bearer_auth(access_token)
            .query(&[
                ("format", "metadata"),
                ("metadataHeaders", "From"),
                ("metadataHeaders", "Subject"),
                ("metadataHeaders", "Date"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(message_id = %id, "gmail message disappeared, skipping");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: sanitize_api_error(&body),
            });
        }

        let detail: MessageDetail = response.json().await?;
        let headers = detail
            .payload
            .as_ref()
            .map_or(&[][..], |p| p.headers.as_slice());

        Ok(Some(EmailMessage {
            id: id.to_string(),
            from: header_value(headers, "From"),
            subject: header_value(headers, "Subject"),
            date: header_value(headers, "Date"),
            snippet: detail.snippet.unwrap_or_default(),
        }))
    }

    async fn fetch_impl(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<EmailMessage>, SourceError> {
        let access_token = self.access_token().await?;
        let mut ids = self.list_ids(&access_token, query, max_results).await?;
        ids.truncate(usize::try_from(max_results).unwrap_or(usize::MAX));

        let mut emails = Vec::with_capacity(ids.len());
        for id in &ids {
            if let Some(email) = self.message_metadata(&access_token, id).await? {
                emails.push(email);
            }
        }

        tracing::info!(count = emails.len(), query = %query, "gmail.fetch");
        Ok(emails)
    }
}

impl EmailSource for GmailSource {
    fn name(&self) -> &str {
        "gmail"
    }

    fn fetch<'a>(
        &'a self,
        query: &'a str,
        max_results: u32,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<EmailMessage>, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_impl(query, max_results))
    }
}
