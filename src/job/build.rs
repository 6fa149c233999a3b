//! Wires a `DailyJob` out of the loaded configuration.

use super::daily::{CallTarget, DailyJob};
use crate::config::{Config, require};
use crate::core::agent::{Summarizer, SummarizerOptions};
use crate::core::mail::{EmailSource, GmailCredentials, GmailSource};
use crate::core::mail::gmail::{DEFAULT_API_BASE, DEFAULT_TOKEN_URL};
use crate::core::providers::{GeminiProvider, build_provider_client};
use crate::delivery::{ElevenLabsSpeech, LocalAudioStore, LogSummaryStore, TwilioCaller, TwilioCredentials};
use crate::error::CallerError;
use crate::runtime::observability::{LogObserver, Observer};
use std::sync::Arc;
use std::time::Duration;

pub fn build_summarizer(config: &Config, observer: Arc<dyn Observer>) -> Summarizer {
    let mut provider = GeminiProvider::new(config.model.api_key.as_deref());
    if let Some(base_url) = &config.model.base_url {
        provider = provider.with_base_url(base_url.as_str());
    }

    Summarizer::new(
        Arc::new(provider),
        observer,
        SummarizerOptions {
            model: config.model.model.clone(),
            temperature: config.model.temperature,
            query: config.gmail.query.clone(),
            max_results: config.gmail.max_results,
            forced_max_steps: config.summarizer.forced_max_steps,
        },
    )
}

pub fn build_email_source(config: &Config) -> Result<Arc<dyn EmailSource>, CallerError> {
    let gmail = &config.gmail;
    let credentials = GmailCredentials {
        client_id: require(gmail.client_id.as_ref(), "gmail.client_id")?.to_string(),
        client_secret: require(gmail.client_secret.as_ref(), "gmail.client_secret")?.to_string(),
        refresh_token: require(gmail.refresh_token.as_ref(), "gmail.refresh_token")?.to_string(),
    };
    let source = GmailSource::new(build_provider_client(), credentials).with_endpoints(
        gmail.token_url.as_deref().unwrap_or(DEFAULT_TOKEN_URL),
        gmail.api_base.as_deref().unwrap_or(DEFAULT_API_BASE),
    );
    Ok(Arc::new(source))
}

/// Telephony settings are only required when the call will be placed.
pub fn build_daily_job(config: &Config, dry_run: bool) -> Result<DailyJob, CallerError> {
    let observer: Arc<dyn Observer> = Arc::new(LogObserver::new());
    let summarizer = build_summarizer(config, observer);
    let source = build_email_source(config)?;
    let client = build_provider_client();

    let speech_config = &config.speech;
    let mut speech = ElevenLabsSpeech::new(
        client.clone(),
        require(speech_config.api_key.as_ref(), "speech.api_key")?,
        require(speech_config.voice_id.as_ref(), "speech.voice_id")?,
    )
    .with_model_id(speech_config.model_id.as_str());
    if let Some(base_url) = &speech_config.base_url {
        speech = speech.with_base_url(base_url.as_str());
    }

    let mut job = DailyJob::new(
        summarizer,
        source,
        Arc::new(speech),
        Arc::new(LocalAudioStore::new(config.audio_dir())),
        Arc::new(LogSummaryStore),
    )
    .with_timeout(Duration::from_secs(config.summarizer.timeout_secs));

    if !dry_run {
        let telephony = &config.telephony;
        let credentials = TwilioCredentials {
            account_sid: require(telephony.account_sid.as_ref(), "telephony.account_sid")?
                .to_string(),
            auth_token: require(telephony.auth_token.as_ref(), "telephony.auth_token")?
                .to_string(),
            from_number: require(telephony.from_number.as_ref(), "telephony.from_number")?
                .to_string(),
        };
        let mut caller = TwilioCaller::new(
            client,
            credentials,
            require(
                telephony.callback_base_url.as_ref(),
                "telephony.callback_base_url",
            )?,
        )?;
        if let Some(base_url) = &telephony.base_url {
            caller = caller.with_base_url(base_url.as_str());
        }
        job = job.with_call(CallTarget {
            placer: Arc::new(caller),
            to: require(telephony.to_number.as_ref(), "telephony.to_number")?.to_string(),
        });
    }

    Ok(job)
}
