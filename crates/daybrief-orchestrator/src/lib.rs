//! The daily digest pipeline.
//!
//! For every channel the bot belongs to, the pipeline fetches today's
//! messages, resolves author names, asks the selected completion provider for
//! a summary (falling back to a statistical digest) and posts the result.
//!
//! # Main types
//!
//! - [`PipelineRunner`] — Runs the fetch, enrich, compose, deliver sequence.
//! - [`DigestComposer`] — Builds the prompt and the [`Digest`].
//! - [`UserDirectory`] — Id-indexed users for [`enrich`].
//! - [`Scheduler`] — Cron loop that triggers runs.

/// Prompt construction and digest rendering.
pub mod composer;
/// Author name resolution.
pub mod enrich;
/// Per-run orchestration and outcome reporting.
pub mod pipeline;
/// Cron-driven run trigger.
pub mod scheduler;

pub use composer::{Digest, DigestComposer, DigestSource, DIGEST_HEADING};
pub use enrich::{enrich, UserDirectory};
pub use pipeline::{
    ChannelOutcome, ChannelReport, PipelineConfig, PipelineRunner, RunReport,
    UserDirectoryPolicy,
};
pub use scheduler::{ScheduleConfig, Scheduler};
