use super::{send_chat, CompletionProvider};
use crate::config::AiConfig;
use async_trait::async_trait;
use daybrief_core::DaybriefResult;
use tracing::debug;

/// Local OpenAI-compatible backend.
///
/// Works with LM Studio, Ollama and any other server exposing
/// `{base_url}/chat/completions` without authentication.
pub struct LocalModelProvider {
    config: AiConfig,
    http: reqwest::Client,
}

impl LocalModelProvider {
    /// Build from the `ai.local` section and shared sampling settings.
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.local.base_url().trim_end_matches('/')
        )
    }

    fn build_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.local.model(),
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
impl CompletionProvider for LocalModelProvider {
    fn name(&self) -> &str {
        "local"
    }

    async fn complete(&self, prompt: &str) -> DaybriefResult<String> {
        let url = self.url();
        debug!(%url, model = self.config.local.model(), "Local completion request");

        send_chat(self.name(), self.http.post(&url), &self.build_body(prompt)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_lm_studio() {
        let provider = LocalModelProvider::new(AiConfig::default());
        assert_eq!(provider.url(), "http://localhost:1234/v1/chat/completions");
        assert_eq!(provider.build_body("p")["model"], "default");
    }
}
