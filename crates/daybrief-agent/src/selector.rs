use crate::backends::azure::AzureOpenAiProvider;
use crate::backends::local::LocalModelProvider;
use crate::backends::CompletionProvider;
use crate::config::{AiConfig, ProviderKind};
use daybrief_core::DaybriefResult;
use tracing::info;

/// Holds the one completion backend chosen at startup.
///
/// The choice is fixed for the life of the process. There is no retry
/// against the other backend when the chosen one fails.
pub struct ProviderSelector {
    provider: Box<dyn CompletionProvider>,
}

impl ProviderSelector {
    /// Validate `config` and build the backend it selects.
    pub fn from_config(config: &AiConfig) -> DaybriefResult<Self> {
        config.validate()?;
        let provider: Box<dyn CompletionProvider> = match config.provider_kind() {
            ProviderKind::Azure => Box::new(AzureOpenAiProvider::new(config.clone())),
            ProviderKind::Local => Box::new(LocalModelProvider::new(config.clone())),
        };
        info!(provider = provider.name(), "Completion provider selected");
        Ok(Self { provider })
    }

    /// Wrap a pre-built backend (for custom providers and tests).
    pub fn from_provider(provider: Box<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// The selected backend.
    pub fn select(&self) -> &dyn CompletionProvider {
        self.provider.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::AzureConfig;

    #[test]
    fn test_flag_selects_local() {
        let config = AiConfig {
            use_local_model: true,
            ..AiConfig::default()
        };
        let selector = ProviderSelector::from_config(&config).unwrap();
        assert_eq!(selector.select().name(), "local");
    }

    #[test]
    fn test_default_selects_azure() {
        let config = AiConfig {
            azure: AzureConfig {
                endpoint: "https://res.openai.azure.com".into(),
                api_key: "k".into(),
                deployment: "d".into(),
                api_version: "2024-02-01".into(),
            },
            ..AiConfig::default()
        };
        let selector = ProviderSelector::from_config(&config).unwrap();
        assert_eq!(selector.select().name(), "azure-openai");
    }

    #[test]
    fn test_incomplete_azure_config_is_rejected() {
        assert!(ProviderSelector::from_config(&AiConfig::default()).is_err());
    }
}
