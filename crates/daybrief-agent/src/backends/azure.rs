use super::{send_chat, CompletionProvider};
use crate::config::AiConfig;
use async_trait::async_trait;
use daybrief_core::DaybriefResult;
use tracing::debug;

/// Azure OpenAI chat-completions backend.
///
/// Posts to `{endpoint}/openai/deployments/{deployment}/chat/completions`
/// with the `api-key` header. The deployment fixes the model, so no `model`
/// field is sent.
pub struct AzureOpenAiProvider {
    config: AiConfig,
    http: reqwest::Client,
}

impl AzureOpenAiProvider {
    /// Build from the `ai.azure` section and shared sampling settings.
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self) -> String {
        let azure = &self.config.azure;
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            azure.endpoint.trim_end_matches('/'),
            azure.deployment,
            azure.api_version()
        )
    }

    fn build_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "messages": [
                {"role": "system", "content": self.config.system_prompt},
                {"role": "user", "content": prompt}
            ],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "top_p": self.config.top_p,
        })
    }
}

#[async_trait]
impl CompletionProvider for AzureOpenAiProvider {
    fn name(&self) -> &str {
        "azure-openai"
    }

    async fn complete(&self, prompt: &str) -> DaybriefResult<String> {
        let url = self.url();
        debug!(deployment = %self.config.azure.deployment, "Azure OpenAI completion request");

        let request = self
            .http
            .post(&url)
            .header("api-key", &self.config.azure.api_key);

        send_chat(self.name(), request, &self.build_body(prompt)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::AzureConfig;

    fn provider() -> AzureOpenAiProvider {
        AzureOpenAiProvider::new(AiConfig {
            azure: AzureConfig {
                endpoint: "https://res.openai.azure.com/".into(),
                api_key: "k".into(),
                deployment: "gpt-4o".into(),
                api_version: String::new(),
            },
            ..AiConfig::default()
        })
    }

    #[test]
    fn test_url_uses_deployment_and_default_version() {
        assert_eq!(
            provider().url(),
            "https://res.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2023-05-15"
        );
    }

    #[test]
    fn test_body_has_no_model_field() {
        let body = provider().build_body("summarize");
        assert!(body.get("model").is_none());
        assert_eq!(body["messages"][1]["content"], "summarize");
        assert_eq!(body["max_tokens"], 800);
    }
}
