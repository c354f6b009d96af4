//! Chat platform access for Daybrief.
//!
//! Provides the [`ChatPlatformClient`] trait consumed by the digest pipeline
//! and a concrete implementation for the Slack Web API.
//!
//! # Main types
//!
//! - [`ChatPlatformClient`] — List channels, users and history; post messages.
//! - [`SlackClient`] — Slack Web API implementation.
//! - [`SlackConfig`] — Token, API base URL and history page size.

/// Platform client trait.
pub mod platform;
/// Slack Web API client.
pub mod slack;

pub use platform::ChatPlatformClient;
pub use slack::{SlackClient, SlackConfig};
