use daybrief_core::{DaybriefError, DaybriefResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which backend produces completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Azure OpenAI deployment.
    Azure,
    /// Local OpenAI-compatible server (LM Studio and similar).
    Local,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Azure => f.write_str("azure"),
            ProviderKind::Local => f.write_str("local"),
        }
    }
}

/// Completion settings, resolved once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Use the local server instead of Azure OpenAI.
    #[serde(default)]
    pub use_local_model: bool,
    /// Completion length cap.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Nucleus sampling cutoff.
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    /// System message sent ahead of every prompt.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Used when `use_local_model` is false.
    #[serde(default)]
    pub azure: AzureConfig,
    /// Used when `use_local_model` is true.
    #[serde(default)]
    pub local: LocalConfig,
}

fn default_max_tokens() -> u32 {
    800
}

fn default_temperature() -> f64 {
    0.7
}

fn default_top_p() -> f64 {
    0.95
}

fn default_system_prompt() -> String {
    "You are a helpful assistant.".to_string()
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            use_local_model: false,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            system_prompt: default_system_prompt(),
            azure: AzureConfig::default(),
            local: LocalConfig::default(),
        }
    }
}

impl AiConfig {
    /// The backend selected by `use_local_model`.
    pub fn provider_kind(&self) -> ProviderKind {
        if self.use_local_model {
            ProviderKind::Local
        } else {
            ProviderKind::Azure
        }
    }

    /// Checks that the selected backend has what it needs.
    /// Settings of the unselected backend are not inspected.
    pub fn validate(&self) -> DaybriefResult<()> {
        if self.provider_kind() == ProviderKind::Azure {
            let azure = &self.azure;
            for (field, value) in [
                ("ai.azure.endpoint", &azure.endpoint),
                ("ai.azure.api_key", &azure.api_key),
                ("ai.azure.deployment", &azure.deployment),
            ] {
                if value.trim().is_empty() {
                    return Err(DaybriefError::Config(format!("{field} is required")));
                }
            }
        }
        Ok(())
    }
}

/// Azure OpenAI deployment settings.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AzureConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    #[serde(default)]
    pub endpoint: String,
    /// Sent as the `api-key` header.
    #[serde(default)]
    pub api_key: String,
    /// Deployment name in the request path.
    #[serde(default)]
    pub deployment: String,
    /// Falls back to `2023-05-15` when empty.
    #[serde(default)]
    pub api_version: String,
}

impl AzureConfig {
    /// The `api-version` query value.
    pub fn api_version(&self) -> &str {
        if self.api_version.is_empty() {
            "2023-05-15"
        } else {
            &self.api_version
        }
    }
}

impl fmt::Debug for AzureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version())
            .finish()
    }
}

/// Local OpenAI-compatible server settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalConfig {
    /// Falls back to `http://localhost:1234/v1` when empty.
    #[serde(default)]
    pub base_url: String,
    /// Falls back to `default` when empty.
    #[serde(default)]
    pub model: String,
}

impl LocalConfig {
    /// Server root including `/v1`.
    pub fn base_url(&self) -> &str {
        if self.base_url.is_empty() {
            "http://localhost:1234/v1"
        } else {
            &self.base_url
        }
    }

    /// Model name sent in the request body.
    pub fn model(&self) -> &str {
        if self.model.is_empty() {
            "default"
        } else {
            &self.model
        }
    }
}
