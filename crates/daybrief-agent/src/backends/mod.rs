pub mod azure;
pub mod local;

use async_trait::async_trait;
use daybrief_core::{DaybriefError, DaybriefResult};

/// A service that turns a prompt into generated text.
///
/// Implementations return [`DaybriefError::Completion`] on network, auth or
/// protocol failures, and an empty string when the backend answered without
/// usable content. Callers treat both the same way.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &str;

    /// Single-turn completion of `prompt`.
    async fn complete(&self, prompt: &str) -> DaybriefResult<String>;
}

/// Send a chat-completions request and pull out the first choice's text.
pub(crate) async fn send_chat(
    provider: &str,
    request: reqwest::RequestBuilder,
    body: &serde_json::Value,
) -> DaybriefResult<String> {
    let resp = request
        .json(body)
        .send()
        .await
        .map_err(|e| DaybriefError::Completion(format!("{provider} request error: {e}")))?;

    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| DaybriefError::Completion(format!("{provider} read error: {e}")))?;

    if !status.is_success() {
        return Err(DaybriefError::Completion(format!(
            "{provider} API error {status}: {text}"
        )));
    }

    let value: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
        DaybriefError::Completion(format!("{provider} returned malformed JSON: {e}"))
    })?;

    Ok(parse_chat_completion(&value))
}

/// `choices[0].message.content`, or an empty string when absent.
pub fn parse_chat_completion(body: &serde_json::Value) -> String {
    body["choices"][0]["message"]["content"]
        .as_str()
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_first_choice() {
        let body = json!({
            "choices": [
                {"message": {"role": "assistant", "content": "Topic X discussed."}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]
        });
        assert_eq!(parse_chat_completion(&body), "Topic X discussed.");
    }

    #[test]
    fn test_parse_missing_content_is_empty() {
        assert_eq!(parse_chat_completion(&json!({"choices": []})), "");
        assert_eq!(parse_chat_completion(&json!({})), "");
        assert_eq!(
            parse_chat_completion(&json!({"choices": [{"message": {"content": null}}]})),
            ""
        );
    }
}
