use crate::core::agent::StepTrace;
use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `dailycall`.
///
/// Each stage of the daily job defines its own variant so the caller can
/// tell a dead inbox apart from a model that never produced a summary.
/// Provider internals keep using `anyhow::Result` for context chains.
#[derive(Debug, Error)]
pub enum CallerError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Summarization core ──────────────────────────────────────────────
    #[error("summarize: {0}")]
    Summarize(#[from] SummarizeError),

    // ── Speech synthesis ────────────────────────────────────────────────
    #[error("speech: {0}")]
    Speech(#[from] SpeechError),

    // ── Call placement ──────────────────────────────────────────────────
    #[error("telephony: {0}")]
    Telephony(#[from] TelephonyError),

    // ── Audio / record storage ──────────────────────────────────────────
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Email source errors ─────────────────────────────────────────────────────

/// Failure of the upstream mailbox. Every variant is surfaced to the caller
/// as `SourceUnavailable`; none of them is retried by the summarizer.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("email source unreachable: {0}")]
    Unreachable(String),

    #[error("email source rejected credentials: {0}")]
    CredentialsRejected(String),

    #[error("email source returned {status}: {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for SourceError {
    fn from(error: reqwest::Error) -> Self {
        Self::Unreachable(error.to_string())
    }
}

// ─── Tool errors ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("tool {name} not found")]
    NotFound { name: String },

    #[error("tool {name} received invalid arguments: {message}")]
    InvalidArguments { name: String, message: String },

    #[error(transparent)]
    Source(#[from] SourceError),
}

// ─── Summarization errors ───────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),

    #[error("model backend failed: {0}")]
    Backend(#[source] anyhow::Error),

    #[error("no valid submitSummary call after {attempts} attempt(s)")]
    Failed {
        attempts: u32,
        traces: Vec<StepTrace>,
    },

    #[error("summarization timed out after {secs}s")]
    TimedOut { secs: u64 },
}

impl SummarizeError {
    /// Attempt count carried by a terminal failure, for diagnostics.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::Failed { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }
}

// ─── Delivery errors ────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("nothing to synthesize: speakable text is empty")]
    EmptyText,

    #[error("speech request failed: {0}")]
    Request(String),

    #[error("speech api returned {status}: {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Error)]
pub enum TelephonyError {
    #[error("invalid callback url: {0}")]
    CallbackUrl(String),

    #[error("call request failed: {0}")]
    Request(String),

    #[error("telephony api returned {status}: {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("audio write failed for {key}: {source}")]
    AudioWrite {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("summary record rejected: {0}")]
    Record(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, CallerError>;
