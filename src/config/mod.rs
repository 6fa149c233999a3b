mod env_overrides;
mod loader;
#[cfg(test)]
mod test_env;
mod types;

pub use loader::require;
pub use types::{
    Config, GmailConfig, JobConfig, ModelConfig, SpeechConfig, SummarizerConfig, TelephonyConfig,
};
