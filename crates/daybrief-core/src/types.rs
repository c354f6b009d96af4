use crate::time::SlackTs;
use serde::{Deserialize, Serialize};

/// A conversation the bot can see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Platform identifier. May be empty when the platform omitted it.
    pub id: String,
    /// Human-readable channel name.
    pub name: String,
    /// Whether the bot is a member of the channel.
    pub is_member: bool,
}

impl Channel {
    /// Creates a channel the bot is a member of.
    pub fn member(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_member: true,
        }
    }
}

/// A workspace user, used only for name resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Platform identifier, matched against [`Message::user_id`].
    pub id: String,
    /// Account name shown in transcripts.
    pub name: String,
}

impl User {
    /// Creates a user record.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A single channel message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Author identifier. Empty for messages without a human author.
    pub user_id: String,
    /// Message body as sent.
    pub text: String,
    /// When the message was posted.
    pub ts: SlackTs,
}

impl Message {
    /// Creates a message record.
    pub fn new(user_id: impl Into<String>, text: impl Into<String>, ts: SlackTs) -> Self {
        Self {
            user_id: user_id.into(),
            text: text.into(),
            ts,
        }
    }
}

/// A [`Message`] with its author's display name resolved, if known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedMessage {
    /// The original message, unchanged.
    #[serde(flatten)]
    pub message: Message,
    /// Resolved author name, `None` when the author is not in the directory.
    pub display_name: Option<String>,
}

impl EnrichedMessage {
    /// Name to show for the author: the display name, else the raw user id.
    pub fn author(&self) -> &str {
        self.display_name
            .as_deref()
            .unwrap_or(&self.message.user_id)
    }
}
