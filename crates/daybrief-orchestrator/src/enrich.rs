use daybrief_core::{EnrichedMessage, Message, User};
use std::collections::HashMap;
use tracing::debug;

/// Workspace users indexed by id, fetched once per run.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    names: HashMap<String, String>,
}

impl UserDirectory {
    /// A directory that resolves nobody.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Name registered for `user_id`.
    pub fn name_of(&self, user_id: &str) -> Option<&str> {
        self.names.get(user_id).map(String::as_str)
    }

    /// Number of known users.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// No users are known.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl From<Vec<User>> for UserDirectory {
    fn from(users: Vec<User>) -> Self {
        Self {
            names: users.into_iter().map(|u| (u.id, u.name)).collect(),
        }
    }
}

/// Attach display names to `messages`. Unknown authors keep `None`.
pub fn enrich(messages: Vec<Message>, directory: &UserDirectory) -> Vec<EnrichedMessage> {
    messages
        .into_iter()
        .map(|message| {
            let display_name = directory.name_of(&message.user_id).map(str::to_string);
            if display_name.is_none() {
                debug!(user_id = %message.user_id, "No directory entry for message author");
            }
            EnrichedMessage {
                message,
                display_name,
            }
        })
        .collect()
}
