use daybrief_agent::ProviderSelector;
use daybrief_core::EnrichedMessage;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

/// First line of every digest.
pub const DIGEST_HEADING: &str = "*Daily Summary*";

/// How many messages the fallback digest quotes.
const RECENT_MESSAGE_COUNT: usize = 3;

const PROMPT_PREAMBLE: &str = "The following are today's messages from a Slack channel. \
Write a summary of these messages. Keep the summary concise, cover the main topics and \
points, and format it with Slack markup (mrkdwn).\n\n";

/// Where a digest's body came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestSource {
    /// Text generated by the completion provider.
    Ai,
    /// Counts and recent messages, built without the provider.
    Fallback,
}

/// The text posted to a channel. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    body: String,
    source: DigestSource,
}

impl Digest {
    /// Wrap provider output under the heading.
    pub fn ai(text: &str) -> Self {
        Self {
            body: format!("{DIGEST_HEADING}\n\n{text}"),
            source: DigestSource::Ai,
        }
    }

    /// Message count, distinct author count and the most recent messages.
    ///
    /// Authors are rendered as raw `<@user_id>` mentions so the platform
    /// resolves them, whether or not enrichment found a name.
    pub fn fallback(messages: &[EnrichedMessage]) -> Self {
        let users: HashSet<&str> = messages
            .iter()
            .map(|m| m.message.user_id.as_str())
            .collect();

        let mut body = String::new();
        body.push_str(&format!("{DIGEST_HEADING}\n"));
        body.push_str(&format!("Total messages today: {}\n", messages.len()));
        body.push_str(&format!("Active users: {}\n\n", users.len()));

        let mut recent: Vec<&EnrichedMessage> = messages.iter().collect();
        // Stable sort: equal timestamps keep their original order.
        recent.sort_by(|a, b| b.message.ts.cmp_instant(&a.message.ts));
        recent.truncate(RECENT_MESSAGE_COUNT);

        if !recent.is_empty() {
            body.push_str("*Recent messages:*\n");
            for m in recent {
                body.push_str(&format!(
                    "• [{}] <@{}>: {}\n",
                    m.message.ts.clock_time(),
                    m.message.user_id,
                    m.message.text
                ));
            }
        }

        Self {
            body,
            source: DigestSource::Fallback,
        }
    }

    /// The text to post.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Whether the body came from the provider or the fallback.
    pub fn source(&self) -> DigestSource {
        self.source
    }

    /// Consume the digest, keeping only its text.
    pub fn into_body(self) -> String {
        self.body
    }
}

/// One line per message, oldest first:
/// `[HH:MM:SS] User {name}: {text}`.
pub fn build_transcript(messages: &[EnrichedMessage]) -> String {
    let mut ordered: Vec<&EnrichedMessage> = messages.iter().collect();
    ordered.sort_by(|a, b| a.message.ts.cmp_instant(&b.message.ts));

    let mut transcript = String::new();
    for m in ordered {
        transcript.push_str(&format!(
            "[{}] User {}: {}\n",
            m.message.ts.clock_time(),
            m.author(),
            m.message.text
        ));
    }
    transcript
}

/// The summarization request sent to the provider.
pub fn build_prompt(messages: &[EnrichedMessage]) -> String {
    format!("{PROMPT_PREAMBLE}{}", build_transcript(messages))
}

/// Turns a channel's messages into a [`Digest`].
pub struct DigestComposer {
    providers: ProviderSelector,
}

impl DigestComposer {
    /// Compose with whichever provider `providers` selected.
    pub fn new(providers: ProviderSelector) -> Self {
        Self { providers }
    }

    /// Ask the provider once; fall back on error or blank output.
    /// This never fails.
    pub async fn compose(&self, messages: &[EnrichedMessage]) -> Digest {
        if messages.is_empty() {
            return Digest::fallback(messages);
        }

        let provider = self.providers.select();
        match provider.complete(&build_prompt(messages)).await {
            Ok(text) if !text.trim().is_empty() => Digest::ai(&text),
            Ok(_) => {
                info!(
                    provider = provider.name(),
                    "Provider returned no content, using fallback digest"
                );
                Digest::fallback(messages)
            }
            Err(e) => {
                warn!(
                    provider = provider.name(),
                    error = %e,
                    "Completion failed, using fallback digest"
                );
                Digest::fallback(messages)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use daybrief_agent::CompletionProvider;
    use daybrief_core::{DaybriefError, DaybriefResult, Message};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Provider that replays a fixed answer and counts calls.
    struct ScriptedProvider {
        answer: Option<String>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, _prompt: &str) -> DaybriefResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
                .clone()
                .ok_or_else(|| DaybriefError::Completion("backend down".into()))
        }
    }

    fn composer(answer: Option<&str>) -> (DigestComposer, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = ScriptedProvider {
            answer: answer.map(str::to_string),
            calls: calls.clone(),
        };
        let selector = ProviderSelector::from_provider(Box::new(provider));
        (DigestComposer::new(selector), calls)
    }

    fn enriched(user: &str, name: Option<&str>, text: &str, ts: &str) -> EnrichedMessage {
        EnrichedMessage {
            message: Message::new(user, text, ts.parse().unwrap()),
            display_name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_transcript_is_ascending_and_uses_names() {
        let messages = vec![
            enriched("U2", None, "later", "2000.0"),
            enriched("U1", Some("alice"), "earlier", "1000.0"),
        ];
        let transcript = build_transcript(&messages);
        let lines: Vec<&str> = transcript.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("] User alice: earlier"));
        assert!(lines[1].ends_with("] User U2: later"));
        let clock = messages[1].message.ts.clock_time();
        assert!(lines[0].starts_with(&format!("[{clock}]")));
    }

    #[test]
    fn test_prompt_embeds_transcript() {
        let messages = vec![enriched("U1", Some("alice"), "ship it", "1000.0")];
        let prompt = build_prompt(&messages);
        assert!(prompt.contains("Slack"));
        assert!(prompt.ends_with("User alice: ship it\n"));
    }

    #[test]
    fn test_fallback_counts_and_recent_messages() {
        let messages = vec![
            enriched("U1", Some("alice"), "one", "1.0"),
            enriched("U2", None, "two", "2.0"),
            enriched("U1", Some("alice"), "three", "3.0"),
            enriched("U3", None, "four", "4.0"),
        ];
        let digest = Digest::fallback(&messages);
        assert_eq!(digest.source(), DigestSource::Fallback);

        let body = digest.body();
        assert!(body.starts_with("*Daily Summary*\n"));
        assert!(body.contains("Total messages today: 4\n"));
        assert!(body.contains("Active users: 3\n"));

        let bullets: Vec<&str> = body.lines().filter(|l| l.starts_with('•')).collect();
        assert_eq!(bullets.len(), 3);
        assert!(bullets[0].ends_with("<@U3>: four"));
        assert!(bullets[1].ends_with("<@U1>: three"));
        assert!(bullets[2].ends_with("<@U2>: two"));
    }

    #[test]
    fn test_fallback_ties_keep_original_order() {
        let messages = vec![
            enriched("U1", None, "first", "5.0"),
            enriched("U2", None, "second", "5.0"),
            enriched("U3", None, "third", "5.0"),
            enriched("U4", None, "fourth", "5.0"),
        ];
        let body = Digest::fallback(&messages).into_body();
        let bullets: Vec<&str> = body.lines().filter(|l| l.starts_with('•')).collect();
        assert!(bullets[0].ends_with("first"));
        assert!(bullets[1].ends_with("second"));
        assert!(bullets[2].ends_with("third"));
    }

    #[test]
    fn test_fallback_on_empty_slice_is_not_empty() {
        let digest = Digest::fallback(&[]);
        assert!(!digest.body().is_empty());
        assert!(digest.body().contains("Total messages today: 0"));
        assert!(!digest.body().contains("Recent messages"));
    }

    #[tokio::test]
    async fn test_compose_wraps_ai_text() {
        let (composer, calls) = composer(Some("Topic X discussed."));
        let digest = composer
            .compose(&[enriched("U1", Some("alice"), "hi", "1000.0")])
            .await;
        assert_eq!(digest.source(), DigestSource::Ai);
        assert_eq!(digest.body(), "*Daily Summary*\n\nTopic X discussed.");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_compose_falls_back_on_error() {
        let (composer, calls) = composer(None);
        let digest = composer
            .compose(&[enriched("U1", Some("alice"), "hi", "1000.0")])
            .await;
        assert_eq!(digest.source(), DigestSource::Fallback);
        assert!(digest.body().contains("Total messages today: 1"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_compose_falls_back_on_blank_text() {
        for blank in ["", "  \n\t"] {
            let (composer, _) = composer(Some(blank));
            let digest = composer
                .compose(&[enriched("U1", None, "hi", "1000.0")])
                .await;
            assert_eq!(digest.source(), DigestSource::Fallback);
            assert!(digest.body().contains("Active users: 1"));
        }
    }

    #[tokio::test]
    async fn test_compose_empty_skips_provider() {
        let (composer, calls) = composer(Some("unused"));
        let digest = composer.compose(&[]).await;
        assert_eq!(digest.source(), DigestSource::Fallback);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
