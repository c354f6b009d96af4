use async_trait::async_trait;
use daybrief_core::{Channel, DayWindow, DaybriefResult, Message, User};

/// Read and write access to a chat workspace.
///
/// Listing calls fail with [`daybrief_core::DaybriefError::Platform`] on
/// transport errors or a non-ok API status. Posting never fails: the outcome
/// is returned as a boolean and the reason is logged by the implementation.
#[async_trait]
pub trait ChatPlatformClient: Send + Sync {
    /// Short platform name used in logs.
    fn name(&self) -> &str;

    /// Channels the bot is a member of, in platform order.
    async fn list_member_channels(&self) -> DaybriefResult<Vec<Channel>>;

    /// Every user in the workspace.
    async fn list_users(&self) -> DaybriefResult<Vec<User>>;

    /// Messages posted inside `window`, ascending by timestamp.
    /// An empty vector means the channel was quiet.
    async fn list_messages(&self, channel_id: &str, window: DayWindow)
        -> DaybriefResult<Vec<Message>>;

    /// Posts `text` to the channel. Returns whether delivery succeeded.
    async fn post_message(&self, channel_id: &str, text: &str) -> bool;
}
