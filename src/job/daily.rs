//! The scheduled pipeline: read inbox, summarize, synthesize, store, call.

use crate::core::agent::Summarizer;
use crate::core::mail::EmailSource;
use crate::core::summary::CallSummary;
use crate::delivery::{AudioStore, CallPlacer, SpeechSynthesizer, SummaryRecord, SummaryStore, audio_key};
use crate::error::{CallerError, SummarizeError};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Who gets called, and through which provider.
pub struct CallTarget {
    pub placer: Arc<dyn CallPlacer>,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub unread_count: u32,
    pub summary_id: String,
    pub audio_key: String,
    /// `None` on a dry run.
    pub call_sid: Option<String>,
}

/// Run one summarization under `timeout`. On expiry the whole invocation is
/// dropped, so nothing it produced is observable.
pub async fn summarize_within(
    summarizer: &Summarizer,
    source: Arc<dyn EmailSource>,
    timeout: Duration,
) -> Result<CallSummary, SummarizeError> {
    tokio::time::timeout(timeout, summarizer.summarize(source))
        .await
        .map_err(|_| SummarizeError::TimedOut {
            secs: timeout.as_secs(),
        })?
}

pub struct DailyJob {
    pub(crate) summarizer: Summarizer,
    pub(crate) source: Arc<dyn EmailSource>,
    pub(crate) speech: Arc<dyn SpeechSynthesizer>,
    pub(crate) audio_store: Arc<dyn AudioStore>,
    pub(crate) summary_store: Arc<dyn SummaryStore>,
    pub(crate) call: Option<CallTarget>,
    pub(crate) timeout: Duration,
}

impl DailyJob {
    pub fn new(
        summarizer: Summarizer,
        source: Arc<dyn EmailSource>,
        speech: Arc<dyn SpeechSynthesizer>,
        audio_store: Arc<dyn AudioStore>,
        summary_store: Arc<dyn SummaryStore>,
    ) -> Self {
        Self {
            summarizer,
            source,
            speech,
            audio_store,
            summary_store,
            call: None,
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_call(mut self, target: CallTarget) -> Self {
        self.call = Some(target);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch and summarize only. Dropped whole on timeout.
    pub async fn summarize(&self) -> Result<CallSummary, SummarizeError> {
        summarize_within(&self.summarizer, Arc::clone(&self.source), self.timeout).await
    }

    /// Full run. With `dry_run` (or no call target) everything but the
    /// call happens.
    pub async fn run(&self, dry_run: bool) -> Result<DailyReport, CallerError> {
        let summary = self.summarize().await?;
        tracing::info!(
            unread_count = summary.unread_count,
            headline = %summary.headline,
            "daily.summarized"
        );

        let audio = self.speech.synthesize(&summary.speakable).await?;

        let now = Utc::now();
        let summary_id = Uuid::new_v4().to_string();
        let key = audio_key(now, Uuid::new_v4());
        self.audio_store.put(&key, &audio).await?;

        let unread_count = summary.unread_count;
        let record = SummaryRecord::new(summary_id.clone(), key.clone(), summary, now);
        self.summary_store.put(&record).await?;

        let call_sid = match (&self.call, dry_run) {
            (Some(target), false) => Some(target.placer.place_call(&target.to, &summary_id).await?),
            (None, false) => {
                tracing::warn!(summary_id = %summary_id, "daily.no_call_target");
                None
            }
            (_, true) => {
                tracing::info!(summary_id = %summary_id, "daily.dry_run");
                None
            }
        };

        Ok(DailyReport {
            unread_count,
            summary_id,
            audio_key: key,
            call_sid,
        })
    }
}
