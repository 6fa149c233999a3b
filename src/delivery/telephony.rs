//! Twilio outbound calls. The call fetches its TwiML from the app's own
//! endpoint, keyed by summary id.

use crate::core::providers::sanitize_api_error;
use crate::error::TelephonyError;
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.twilio.com";

/// Places the briefing call and returns the provider's call id.
pub trait CallPlacer: Send + Sync {
    fn name(&self) -> &str;

    fn place_call<'a>(
        &'a self,
        to: &'a str,
        summary_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, TelephonyError>> + Send + 'a>>;
}

#[derive(Debug, Clone)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

#[derive(Debug, Deserialize)]
struct CallResponse {
    sid: String,
}

pub struct TwilioCaller {
    client: Client,
    credentials: TwilioCredentials,
    callback_base: Url,
    base_url: String,
}

/// `{callback_base}twiml?summaryId=<id>`, with the id query-encoded.
pub fn twiml_url(callback_base: &Url, summary_id: &str) -> Result<Url, TelephonyError> {
    let mut url = callback_base
        .join("twiml")
        .map_err(|e| TelephonyError::CallbackUrl(e.to_string()))?;
    url.query_pairs_mut().append_pair("summaryId", summary_id);
    Ok(url)
}

impl TwilioCaller {
    /// `callback_base` is the public base URL of the TwiML endpoint; a
    /// trailing slash is added when missing so `twiml` joins under it.
    pub fn new(
        client: Client,
        credentials: TwilioCredentials,
        callback_base: &str,
    ) -> Result<Self, TelephonyError> {
        let normalized = if callback_base.ends_with('/') {
            callback_base.to_string()
        } else {
            format!("{callback_base}/")
        };
        let callback_base =
            Url::parse(&normalized).map_err(|e| TelephonyError::CallbackUrl(e.to_string()))?;
        Ok(Self {
            client,
            credentials,
            callback_base,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn place_call_impl(&self, to: &str, summary_id: &str) -> Result<String, TelephonyError> {
        let callback = twiml_url(&self.callback_base, summary_id)?;
        let response = self
            .client
            .post(format!(
                "{}/2010-04-01/Accounts/{}/Calls.json",
                self.base_url, self.credentials.account_sid
            ))
            .basic_auth(
                &self.credentials.account_sid,
                Some(&self.credentials.auth_token),
            )
            .form(&[
                ("To", to),
                ("From", self.credentials.from_number.as_str()),
                ("Url", callback.as_str()),
            ])
            .send()
            .await
            .map_err(|e| TelephonyError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TelephonyError::Api {
                status: status.as_u16(),
                message: sanitize_api_error(&body),
            });
        }

        let call: CallResponse = response
            .json()
            .await
            .map_err(|e| TelephonyError::Request(e.to_string()))?;
        tracing::info!(call_sid = %call.sid, summary_id, "telephony.call_placed");
        Ok(call.sid)
    }
}

impl CallPlacer for TwilioCaller {
    fn name(&self) -> &str {
        "twilio"
    }

    fn place_call<'a>(
        &'a self,
        to: &'a str,
        summary_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, TelephonyError>> + Send + 'a>> {
        Box::pin(self.place_call_impl(to, summary_id))
    }
}
