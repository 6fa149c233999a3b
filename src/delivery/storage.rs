//! Where the rendered briefing lives until the call fetches it.

use crate::error::StorageError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use uuid::Uuid;

use crate::core::summary::CallSummary;

/// How long a summary stays playable after it is written.
pub const SUMMARY_TTL_HOURS: i64 = 6;

/// `summaries/YYYY-MM-DD/<uuid>.mp3`
pub fn audio_key(now: DateTime<Utc>, id: Uuid) -> String {
    format!("summaries/{}/{id}.mp3", now.format("%Y-%m-%d"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRecord {
    pub summary_id: String,
    pub audio_key: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub summary: CallSummary,
}

impl SummaryRecord {
    pub fn new(summary_id: String, audio_key: String, summary: CallSummary, now: DateTime<Utc>) -> Self {
        Self {
            summary_id,
            audio_key,
            created_at: now,
            expires_at: now + Duration::hours(SUMMARY_TTL_HOURS),
            summary,
        }
    }
}

/// Blob store for synthesized audio.
pub trait AudioStore: Send + Sync {
    fn name(&self) -> &str;

    fn put<'a>(
        &'a self,
        key: &'a str,
        audio: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = Result<(), StorageError>> + Send + 'a>>;
}

/// Keyed store for summary records.
pub trait SummaryStore: Send + Sync {
    fn name(&self) -> &str;

    fn put<'a>(
        &'a self,
        record: &'a SummaryRecord,
    ) -> Pin<Box<dyn Future<Output = Result<(), StorageError>> + Send + 'a>>;
}

/// Writes audio under a local root, keeping the key as the relative path.
pub struct LocalAudioStore {
    root: PathBuf,
}

impl LocalAudioStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn write(&self, key: &str, audio: &[u8]) -> Result<(), StorageError> {
        let path = self.root.join(key);
        let io_err = |source| StorageError::AudioWrite {
            key: key.to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        tokio::fs::write(&path, audio).await.map_err(io_err)?;
        tracing::info!(key, bytes = audio.len(), "storage.audio_written");
        Ok(())
    }
}

impl AudioStore for LocalAudioStore {
    fn name(&self) -> &str {
        "local"
    }

    fn put<'a>(
        &'a self,
        key: &'a str,
        audio: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = Result<(), StorageError>> + Send + 'a>> {
        Box::pin(self.write(key, audio))
    }
}

/// Emits the record as a structured log line instead of persisting it.
pub struct LogSummaryStore;

impl SummaryStore for LogSummaryStore {
    fn name(&self) -> &str {
        "log"
    }

    fn put<'a>(
        &'a self,
        record: &'a SummaryRecord,
    ) -> Pin<Box<dyn Future<Output = Result<(), StorageError>> + Send + 'a>> {
        Box::pin(async move {
            let json = serde_json::to_string(record)
                .map_err(|e| StorageError::Record(e.to_string()))?;
            tracing::info!(
                summary_id = %record.summary_id,
                expires_at = %record.expires_at,
                record = %json,
                "storage.summary_recorded"
            );
            Ok(())
        })
    }
}
