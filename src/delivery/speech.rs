//! ElevenLabs text-to-speech.

use crate::core::providers::sanitize_api_error;
use crate::error::SpeechError;
use reqwest::Client;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";
pub const DEFAULT_MODEL_ID: &str = "eleven_turbo_v2_5";

const STABILITY: f64 = 0.4;
const SIMILARITY_BOOST: f64 = 0.8;

/// Turns the briefing text into audio bytes (MP3).
pub trait SpeechSynthesizer: Send + Sync {
    fn name(&self) -> &str;

    fn synthesize<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, SpeechError>> + Send + 'a>>;
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f64,
    similarity_boost: f64,
}

pub struct ElevenLabsSpeech {
    client: Client,
    api_key: String,
    voice_id: String,
    model_id: String,
    base_url: String,
}

impl ElevenLabsSpeech {
    pub fn new(client: Client, api_key: impl Into<String>, voice_id: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            voice_id: voice_id.into(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn synthesize_impl(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let response = self
            .client
            .post(format!("{}/v1/text-to-speech/{}", self.base_url, self.voice_id))
            .header("xi-api-key", &self.api_key)
            .header("accept", "audio/mpeg")
            .json(&SynthesisRequest {
                text,
                model_id: &self.model_id,
                voice_settings: VoiceSettings {
                    stability: STABILITY,
                    similarity_boost: SIMILARITY_BOOST,
                },
            })
            .send()
            .await
            .map_err(|e| SpeechError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Api {
                status: status.as_u16(),
                message: sanitize_api_error(&body),
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Request(e.to_string()))?;
        tracing::info!(bytes = audio.len(), voice = %self.voice_id, "speech.synthesized");
        Ok(audio.to_vec())
    }
}

impl SpeechSynthesizer for ElevenLabsSpeech {
    fn name(&self) -> &str {
        "elevenlabs"
    }

    fn synthesize<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, SpeechError>> + Send + 'a>> {
        Box::pin(self.synthesize_impl(text))
    }
}
