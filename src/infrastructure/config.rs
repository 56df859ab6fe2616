//! Application configuration
//!
//! Defaults, overridden by an optional `adventure.toml` (or any format the
//! `config` crate understands) and then by `ADVENTURE_*` environment
//! variables, e.g. `ADVENTURE_LLM_MODEL=gpt-4o-mini`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::application::services::{NarrationSettings, StoryChatSettings};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server port
    pub server_port: u16,
    /// SQLite connection string for saved games and custom stories
    pub database_url: String,

    /// Chat completion API base URL (OpenAI-compatible, including `/v1`)
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_api_key: Option<String>,
    pub llm_timeout_secs: u64,

    /// Prior messages sent with each game turn
    pub history_window: usize,
    /// Prior messages sent with each story chat message
    pub story_history_window: usize,
    pub max_output_tokens: u32,
    pub turn_temperature: f32,
    pub intro_temperature: f32,
    pub story_temperature: f32,

    /// Extra scenarios loaded on top of the built-in catalog
    pub scenario_catalog_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 3000,
            database_url: "sqlite:adventure.db?mode=rwc".to_string(),
            llm_base_url: "https://api.openai.com/v1".to_string(),
            llm_model: "gpt-3.5-turbo".to_string(),
            llm_api_key: None,
            llm_timeout_secs: 60,
            history_window: 5,
            story_history_window: 10,
            max_output_tokens: 500,
            turn_temperature: 0.8,
            intro_temperature: 0.7,
            story_temperature: 0.7,
            scenario_catalog_path: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from `adventure.*` and the environment
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("adventure").required(false))
            .add_source(config::Environment::with_prefix("ADVENTURE").try_parsing(true))
            .build()
            .context("Failed to read configuration sources")?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    pub fn narration_settings(&self) -> NarrationSettings {
        NarrationSettings {
            history_window: self.history_window,
            max_output_tokens: self.max_output_tokens,
            turn_temperature: self.turn_temperature,
            intro_temperature: self.intro_temperature,
            timeout: self.llm_timeout(),
        }
    }

    pub fn story_chat_settings(&self) -> StoryChatSettings {
        StoryChatSettings {
            history_window: self.story_history_window,
            max_output_tokens: self.max_output_tokens,
            temperature: self.story_temperature,
            timeout: self.llm_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_narration_defaults() {
        let config = AppConfig::default();
        let narration = config.narration_settings();
        let defaults = NarrationSettings::default();

        assert_eq!(narration.history_window, defaults.history_window);
        assert_eq!(narration.max_output_tokens, defaults.max_output_tokens);
        assert_eq!(narration.timeout, defaults.timeout);
        assert_eq!(config.story_chat_settings().history_window, 10);
    }

    #[test]
    fn test_partial_source_keeps_defaults() {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(
                "server_port = 8080\nllm_model = \"local-model\"",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: AppConfig = settings.try_deserialize().unwrap();

        assert_eq!(config.server_port, 8080);
        assert_eq!(config.llm_model, "local-model");
        assert_eq!(config.history_window, 5);
        assert!(config.llm_api_key.is_none());
    }
}
