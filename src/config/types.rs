use crate::core::agent::FORCED_MAX_STEPS;
use crate::core::mail::{DEFAULT_MAX_RESULTS, DEFAULT_QUERY};
use crate::core::providers::gemini::DEFAULT_MODEL;
use crate::delivery::speech::DEFAULT_MODEL_ID as DEFAULT_SPEECH_MODEL_ID;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Workspace directory - computed from home, not serialized
    #[serde(skip)]
    pub workspace_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub gmail: GmailConfig,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub summarizer: SummarizerConfig,

    #[serde(default)]
    pub speech: SpeechConfig,

    #[serde(default)]
    pub telephony: TelephonyConfig,

    #[serde(default)]
    pub job: JobConfig,
}

// ── Gmail ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GmailConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
    #[serde(default = "default_query")]
    pub query: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    /// Override for the OAuth token endpoint
    #[serde(default)]
    pub token_url: Option<String>,
    /// Override for the Gmail REST base URL
    #[serde(default)]
    pub api_base: Option<String>,
}

fn default_query() -> String {
    DEFAULT_QUERY.to_string()
}

fn default_max_results() -> u32 {
    DEFAULT_MAX_RESULTS
}

impl Default for GmailConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            refresh_token: None,
            query: default_query(),
            max_results: default_max_results(),
            token_url: None,
            api_base: None,
        }
    }
}

// ── Model ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model")]
    pub model: String,
    /// Falls back to `GEMINI_API_KEY` and friends when unset
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f64 {
    0.3
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
            temperature: default_temperature(),
            base_url: None,
        }
    }
}

// ── Summarizer ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizerConfig {
    /// Step budget for the forced retry attempt
    #[serde(default = "default_forced_max_steps")]
    pub forced_max_steps: u32,
    /// Wall-clock limit on fetch + summarize
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_forced_max_steps() -> u32 {
    FORCED_MAX_STEPS
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            forced_max_steps: default_forced_max_steps(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ── Speech ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechConfig {
    pub api_key: Option<String>,
    pub voice_id: Option<String>,
    #[serde(default = "default_speech_model_id")]
    pub model_id: String,
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_speech_model_id() -> String {
    DEFAULT_SPEECH_MODEL_ID.to_string()
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            voice_id: None,
            model_id: default_speech_model_id(),
            base_url: None,
        }
    }
}

// ── Telephony ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelephonyConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub from_number: Option<String>,
    pub to_number: Option<String>,
    /// Public base URL serving `twiml?summaryId=...`
    pub callback_base_url: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

// ── Job ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Audio output root; `~` is expanded. Defaults to `<workspace>/audio`.
    #[serde(default)]
    pub audio_dir: Option<String>,
    /// Synthesize and store, but never place the call
    #[serde(default)]
    pub dry_run: bool,
}

impl Config {
    /// Resolved audio root.
    pub fn audio_dir(&self) -> PathBuf {
        self.job.audio_dir.as_deref().map_or_else(
            || self.workspace_dir.join("audio"),
            |dir| PathBuf::from(shellexpand::tilde(dir).into_owned()),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        let dailycall_dir = home.join(".dailycall");

        Self {
            workspace_dir: dailycall_dir.join("workspace"),
            config_path: dailycall_dir.join("config.toml"),
            gmail: GmailConfig::default(),
            model: ModelConfig::default(),
            summarizer: SummarizerConfig::default(),
            speech: SpeechConfig::default(),
            telephony: TelephonyConfig::default(),
            job: JobConfig::default(),
        }
    }
}
