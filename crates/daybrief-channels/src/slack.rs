use crate::platform::ChatPlatformClient;
use async_trait::async_trait;
use daybrief_core::{Channel, DayWindow, DaybriefError, DaybriefResult, Message, SlackTs, User};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Upper bound on cursor-paginated requests for a single listing.
const MAX_PAGES: usize = 100;

/// Slack connection settings.
#[derive(Clone, Deserialize)]
pub struct SlackConfig {
    /// Bot User OAuth token (`xoxb-...`).
    #[serde(default)]
    pub bot_token: String,
    /// Web API base URL, without trailing slash.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Page size (`limit`) for every paginated call: channels, users and history.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

fn default_api_base_url() -> String {
    "https://slack.com/api".to_string()
}

fn default_page_limit() -> u32 {
    1000
}

impl SlackConfig {
    /// Settings for the public Slack API with the given token.
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            api_base_url: default_api_base_url(),
            page_limit: default_page_limit(),
        }
    }
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackConfig")
            .field("bot_token", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("page_limit", &self.page_limit)
            .finish()
    }
}

/// Slack Web API client.
///
/// Reads use `conversations.list`, `users.list` and `conversations.history`
/// with cursor pagination; delivery uses `chat.postMessage`.
pub struct SlackClient {
    config: SlackConfig,
    client: reqwest::Client,
}

// ── Slack API types ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
}

/// Fields shared by every Web API response.
#[derive(Debug, Deserialize)]
struct SlackEnvelope<T> {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
    #[serde(flatten)]
    body: T,
}

#[derive(Debug, Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: Option<String>,
}

/// A listing response carrying one page of items.
trait Page: DeserializeOwned {
    type Item;
    fn into_items(self) -> Vec<Self::Item>;
}

#[derive(Debug, Deserialize)]
struct ChannelsPage {
    #[serde(default)]
    channels: Vec<RawChannel>,
}

#[derive(Debug, Deserialize)]
struct RawChannel {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    is_member: bool,
}

#[derive(Debug, Deserialize)]
struct UsersPage {
    #[serde(default)]
    members: Vec<RawUser>,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryPage {
    #[serde(default)]
    messages: Vec<RawMessage>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    ts: Option<String>,
}

impl Page for ChannelsPage {
    type Item = RawChannel;
    fn into_items(self) -> Vec<RawChannel> {
        self.channels
    }
}

impl Page for UsersPage {
    type Item = RawUser;
    fn into_items(self) -> Vec<RawUser> {
        self.members
    }
}

impl Page for HistoryPage {
    type Item = RawMessage;
    fn into_items(self) -> Vec<RawMessage> {
        self.messages
    }
}

// ── Implementation ──────────────────────────────────────────────────────────

impl SlackClient {
    /// Create a new `SlackClient` from its settings.
    pub fn new(config: SlackConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{method}", self.config.api_base_url.trim_end_matches('/'))
    }

    /// Issue one GET call and unwrap the `ok`/`error` envelope.
    async fn get<T: DeserializeOwned>(
        &self,
        method: &str,
        query: &[(&str, String)],
    ) -> DaybriefResult<SlackEnvelope<T>> {
        let response = self
            .client
            .get(self.url(method))
            .bearer_auth(&self.config.bot_token)
            .query(query)
            .send()
            .await
            .map_err(|e| DaybriefError::Platform(format!("Slack {method} error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DaybriefError::Platform(format!(
                "Slack {method} failed with HTTP {status}"
            )));
        }

        let envelope: SlackEnvelope<T> = response
            .json()
            .await
            .map_err(|e| DaybriefError::Platform(format!("Slack {method} parse error: {e}")))?;

        if !envelope.ok {
            return Err(DaybriefError::Platform(format!(
                "Slack {method} failed: {}",
                envelope.error.as_deref().unwrap_or("unknown_error")
            )));
        }

        Ok(envelope)
    }

    /// Collect every page of a cursor-paginated listing.
    async fn get_all<P: Page>(
        &self,
        method: &str,
        query: &[(&str, String)],
    ) -> DaybriefResult<Vec<P::Item>> {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;

        for page in 0..MAX_PAGES {
            let mut page_query = query.to_vec();
            if let Some(c) = &cursor {
                page_query.push(("cursor", c.clone()));
            }

            let envelope: SlackEnvelope<P> = self.get(method, &page_query).await?;
            items.extend(envelope.body.into_items());

            cursor = envelope
                .response_metadata
                .and_then(|m| m.next_cursor)
                .filter(|c| !c.is_empty());
            if cursor.is_none() {
                debug!(method, pages = page + 1, count = items.len(), "Slack listing complete");
                return Ok(items);
            }
        }

        warn!(method, max_pages = MAX_PAGES, "Slack listing truncated at page limit");
        Ok(items)
    }
}

#[async_trait]
impl ChatPlatformClient for SlackClient {
    fn name(&self) -> &str {
        "slack"
    }

    async fn list_member_channels(&self) -> DaybriefResult<Vec<Channel>> {
        let query = [
            ("types", "public_channel,private_channel".to_string()),
            ("limit", self.config.page_limit.to_string()),
        ];
        let raw = self
            .get_all::<ChannelsPage>("conversations.list", &query)
            .await?;

        Ok(raw
            .into_iter()
            .filter(|c| c.is_member)
            .map(|c| Channel {
                id: c.id.unwrap_or_default(),
                name: c.name.unwrap_or_default(),
                is_member: c.is_member,
            })
            .collect())
    }

    async fn list_users(&self) -> DaybriefResult<Vec<User>> {
        let query = [("limit", self.config.page_limit.to_string())];
        let raw = self.get_all::<UsersPage>("users.list", &query).await?;

        Ok(raw
            .into_iter()
            .filter_map(|u| {
                Some(User {
                    id: u.id?,
                    name: u.name.unwrap_or_default(),
                })
            })
            .collect())
    }

    async fn list_messages(
        &self,
        channel_id: &str,
        window: DayWindow,
    ) -> DaybriefResult<Vec<Message>> {
        let query = [
            ("channel", channel_id.to_string()),
            ("oldest", window.oldest.to_string()),
            ("latest", window.latest.to_string()),
            ("inclusive", "true".to_string()),
            ("limit", self.config.page_limit.to_string()),
        ];
        let raw = self
            .get_all::<HistoryPage>("conversations.history", &query)
            .await?;

        let mut messages: Vec<Message> = raw
            .into_iter()
            .filter_map(|m| {
                let ts = match m.ts.as_deref().map(str::parse::<SlackTs>) {
                    Some(Ok(ts)) => ts,
                    _ => {
                        debug!(channel = %channel_id, "Dropping message without a valid ts");
                        return None;
                    }
                };
                Some(Message {
                    user_id: m.user.unwrap_or_default(),
                    text: m.text.unwrap_or_default(),
                    ts,
                })
            })
            .collect();

        // Slack returns newest first.
        messages.sort_by(|a, b| a.ts.cmp_instant(&b.ts));
        Ok(messages)
    }

    async fn post_message(&self, channel_id: &str, text: &str) -> bool {
        let payload = PostMessageRequest {
            channel: channel_id,
            text,
        };

        let response = match self
            .client
            .post(self.url("chat.postMessage"))
            .bearer_auth(&self.config.bot_token)
            .json(&payload)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(channel = %channel_id, error = %e, "Slack send error");
                return false;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(channel = %channel_id, %status, "Slack chat.postMessage HTTP failure");
            return false;
        }

        match response.json::<SlackEnvelope<serde_json::Value>>().await {
            Ok(body) if body.ok => true,
            Ok(body) => {
                warn!(
                    channel = %channel_id,
                    error = body.error.as_deref().unwrap_or("unknown_error"),
                    "Slack chat.postMessage failed"
                );
                false
            }
            Err(e) => {
                warn!(channel = %channel_id, error = %e, "Slack parse error");
                false
            }
        }
    }
}
