use super::Config;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;
use std::path::Path;

impl Config {
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        Self::load_or_init_in(&home.join(".dailycall"))
    }

    /// Load `<dir>/config.toml`, writing a default one first if absent.
    /// Environment overrides are applied before validation.
    pub fn load_or_init_in(dailycall_dir: &Path) -> Result<Self> {
        let config_path = dailycall_dir.join("config.toml");

        if !dailycall_dir.exists() {
            fs::create_dir_all(dailycall_dir).context("Failed to create .dailycall directory")?;
            fs::create_dir_all(dailycall_dir.join("workspace"))
                .context("Failed to create workspace directory")?;
        }

        let mut config = if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config = toml::from_str(&contents)
                .map_err(|e| ConfigError::Load(e.to_string()))
                .context("Failed to parse config file")?;
            config.config_path.clone_from(&config_path);
            config.workspace_dir = dailycall_dir.join("workspace");
            config
        } else {
            let config = Self {
                config_path: config_path.clone(),
                workspace_dir: dailycall_dir.join("workspace"),
                ..Self::default()
            };
            config.save()?;
            tracing::info!(path = %config_path.display(), "config.initialized");
            config
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }

    /// Range checks that would otherwise surface as odd runtime behavior.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(ConfigError::Validation(format!(
                "model.temperature must be within 0.0..=2.0, got {}",
                self.model.temperature
            )));
        }
        if self.gmail.max_results == 0 {
            return Err(ConfigError::Validation(
                "gmail.max_results must be greater than 0".into(),
            ));
        }
        if self.summarizer.forced_max_steps == 0 {
            return Err(ConfigError::Validation(
                "summarizer.forced_max_steps must be greater than 0".into(),
            ));
        }
        if self.summarizer.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "summarizer.timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Non-empty value or a `MissingCredential` naming the config key.
pub fn require<'a>(value: Option<&'a String>, key: &'static str) -> Result<&'a str, ConfigError> {
    value
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingCredential(key))
}
