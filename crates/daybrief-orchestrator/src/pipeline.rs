use crate::composer::{DigestComposer, DigestSource};
use crate::enrich::{enrich, UserDirectory};
use daybrief_channels::ChatPlatformClient;
use daybrief_core::{Channel, DayWindow, DaybriefResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// What to do when the user directory cannot be fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserDirectoryPolicy {
    /// Abort the run.
    #[default]
    Required,
    /// Continue with an empty directory; every author stays unresolved.
    BestEffort,
}

/// Pipeline behavior settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Failure handling for the user directory fetch.
    #[serde(default)]
    pub user_directory: UserDirectoryPolicy,
}

/// How one channel fared in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelOutcome {
    /// A digest was posted.
    Delivered {
        /// Messages summarized.
        messages: usize,
        /// Where the digest body came from.
        source: DigestSource,
    },
    /// No messages today; nothing posted.
    NoMessages,
    /// The platform returned the channel without an id.
    MissingId,
    /// The message history could not be fetched.
    HistoryFailed(String),
    /// The digest was built but the platform rejected it.
    DeliveryFailed {
        /// Messages summarized.
        messages: usize,
    },
}

impl ChannelOutcome {
    /// History or delivery went wrong for this channel.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ChannelOutcome::HistoryFailed(_) | ChannelOutcome::DeliveryFailed { .. }
        )
    }

    /// Messages read from the channel, zero when none were fetched.
    pub fn message_count(&self) -> usize {
        match self {
            ChannelOutcome::Delivered { messages, .. }
            | ChannelOutcome::DeliveryFailed { messages } => *messages,
            _ => 0,
        }
    }
}

/// Outcome for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelReport {
    /// Platform id, empty when the platform omitted it.
    pub channel_id: String,
    /// Human-readable channel name.
    pub channel_name: String,
    /// What happened.
    pub outcome: ChannelOutcome,
}

/// Summary of one run. Only logged, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// The day the run covered.
    pub window: DayWindow,
    /// The user directory was unavailable and names were left unresolved.
    pub directory_degraded: bool,
    /// One entry per listed channel, in platform order.
    pub channels: Vec<ChannelReport>,
}

impl RunReport {
    /// Channels that received a digest.
    pub fn delivered(&self) -> usize {
        self.count(|o| matches!(o, ChannelOutcome::Delivered { .. }))
    }

    /// Channels whose history or delivery failed.
    pub fn failed(&self) -> usize {
        self.count(ChannelOutcome::is_failure)
    }

    /// Channels with no messages in the window.
    pub fn quiet(&self) -> usize {
        self.count(|o| matches!(o, ChannelOutcome::NoMessages))
    }

    /// Channels listed without an id.
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ChannelOutcome::MissingId))
    }

    fn count(&self, pred: impl Fn(&ChannelOutcome) -> bool) -> usize {
        self.channels.iter().filter(|c| pred(&c.outcome)).count()
    }
}

/// Runs the digest pipeline over every member channel.
///
/// Channels are handled one at a time in platform order. Listing failures
/// abort the run; history and delivery failures only affect their channel.
pub struct PipelineRunner {
    platform: Arc<dyn ChatPlatformClient>,
    composer: DigestComposer,
    config: PipelineConfig,
}

impl PipelineRunner {
    /// Wire a runner from its collaborators.
    pub fn new(
        platform: Arc<dyn ChatPlatformClient>,
        composer: DigestComposer,
        config: PipelineConfig,
    ) -> Self {
        Self {
            platform,
            composer,
            config,
        }
    }

    /// Digest today's messages in the process's local timezone.
    pub async fn run(&self) -> DaybriefResult<RunReport> {
        self.run_for(DayWindow::today()?).await
    }

    /// Digest the messages inside `window`.
    pub async fn run_for(&self, window: DayWindow) -> DaybriefResult<RunReport> {
        info!(
            platform = self.platform.name(),
            oldest = window.oldest,
            latest = window.latest,
            "Digest run started"
        );

        let channels = self.platform.list_member_channels().await.map_err(|e| {
            error!(error = %e, "Failed to list member channels");
            e
        })?;

        let (directory, directory_degraded) = match self.platform.list_users().await {
            Ok(users) => (UserDirectory::from(users), false),
            Err(e) if self.config.user_directory == UserDirectoryPolicy::BestEffort => {
                warn!(error = %e, "User directory unavailable, continuing without names");
                (UserDirectory::empty(), true)
            }
            Err(e) => {
                error!(error = %e, "Failed to list users");
                return Err(e);
            }
        };
        debug!(
            channels = channels.len(),
            users = directory.len(),
            "Run inputs fetched"
        );

        let mut reports = Vec::with_capacity(channels.len());
        for channel in channels {
            let outcome = self.process_channel(&channel, &directory, window).await;
            reports.push(ChannelReport {
                channel_id: channel.id,
                channel_name: channel.name,
                outcome,
            });
        }

        let report = RunReport {
            window,
            directory_degraded,
            channels: reports,
        };
        info!(
            delivered = report.delivered(),
            quiet = report.quiet(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Digest run finished"
        );
        Ok(report)
    }

    async fn process_channel(
        &self,
        channel: &Channel,
        directory: &UserDirectory,
        window: DayWindow,
    ) -> ChannelOutcome {
        if channel.id.is_empty() {
            warn!(name = %channel.name, "Skipping channel without an id");
            return ChannelOutcome::MissingId;
        }

        let messages = match self.platform.list_messages(&channel.id, window).await {
            Ok(m) => m,
            Err(e) => {
                warn!(channel = %channel.id, error = %e, "Failed to fetch channel history");
                return ChannelOutcome::HistoryFailed(e.to_string());
            }
        };

        if messages.is_empty() {
            debug!(channel = %channel.id, "No messages today");
            return ChannelOutcome::NoMessages;
        }

        let count = messages.len();
        let enriched = enrich(messages, directory);
        let digest = self.composer.compose(&enriched).await;
        let source = digest.source();

        if self.platform.post_message(&channel.id, digest.body()).await {
            info!(channel = %channel.id, messages = count, ?source, "Digest delivered");
            ChannelOutcome::Delivered {
                messages: count,
                source,
            }
        } else {
            warn!(channel = %channel.id, messages = count, "Digest delivery failed");
            ChannelOutcome::DeliveryFailed { messages: count }
        }
    }
}
