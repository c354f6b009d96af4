//! `daybrief.toml` loading and validation.

use daybrief_agent::AiConfig;
use daybrief_channels::SlackConfig;
use daybrief_core::{DaybriefError, DaybriefResult};
use daybrief_orchestrator::{PipelineConfig, ScheduleConfig, Scheduler};
use serde::Deserialize;
use std::path::Path;

/// Environment variable that overrides `slack.bot_token`.
pub const SLACK_TOKEN_ENV: &str = "SLACK_BOT_TOKEN";
/// Environment variable that overrides `ai.azure.api_key`.
pub const AZURE_KEY_ENV: &str = "AZURE_OPENAI_API_KEY";

/// Everything the bot needs, resolved once at startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DaybriefConfig {
    /// Slack connection.
    #[serde(default)]
    pub slack: SlackConfig,
    /// Completion backend.
    #[serde(default)]
    pub ai: AiConfig,
    /// Trigger timing for `daybrief schedule`.
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Run behavior.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl DaybriefConfig {
    /// Read `path`, apply environment overrides and validate.
    pub async fn load(path: &Path) -> DaybriefResult<Self> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            DaybriefError::Config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        let mut config = Self::parse(&raw)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML without overrides or validation.
    pub fn parse(raw: &str) -> DaybriefResult<Self> {
        toml::from_str(raw).map_err(|e| DaybriefError::Config(format!("Invalid config: {e}")))
    }

    /// Replace secrets with non-empty values from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(SLACK_TOKEN_ENV).filter(|v| !v.is_empty()) {
            self.slack.bot_token = token;
        }
        if let Some(key) = lookup(AZURE_KEY_ENV).filter(|v| !v.is_empty()) {
            self.ai.azure.api_key = key;
        }
    }

    /// Reject configs that cannot produce a working run.
    pub fn validate(&self) -> DaybriefResult<()> {
        if self.slack.bot_token.trim().is_empty() {
            return Err(DaybriefError::Config(format!(
                "slack.bot_token is required (or set {SLACK_TOKEN_ENV})"
            )));
        }
        self.ai.validate()?;
        Scheduler::parse_cron(&self.schedule.cron)?;
        Ok(())
    }
}
