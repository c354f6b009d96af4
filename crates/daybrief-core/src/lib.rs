//! Core types and error definitions for Daybrief.
//!
//! This crate provides the foundational types shared across all Daybrief
//! crates: the unified error enum, the chat-platform domain model, and the
//! timestamp helpers used to talk to the platform.
//!
//! # Main types
//!
//! - [`DaybriefError`] — Unified error enum for all Daybrief subsystems.
//! - [`DaybriefResult`] — Convenience alias for `Result<T, DaybriefError>`.
//! - [`Channel`], [`User`], [`Message`] — Records fetched from the platform.
//! - [`EnrichedMessage`] — A [`Message`] with its author's display name resolved.
//! - [`SlackTs`] — Platform-native fractional Unix timestamp.
//! - [`DayWindow`] — Closed time interval covering one local calendar day.

/// Platform timestamps and calendar-day windows.
pub mod time;
/// Channel, user and message records.
pub mod types;

pub use time::{DayWindow, SlackTs};
pub use types::{Channel, EnrichedMessage, Message, User};

// --- Error types ---

/// Top-level error type for Daybrief.
///
/// Each variant corresponds to a subsystem that can produce errors.
#[derive(Debug, thiserror::Error)]
pub enum DaybriefError {
    /// The chat platform call failed or returned a non-ok status.
    #[error("Platform error: {0}")]
    Platform(String),

    /// The completion provider failed or returned unusable content.
    #[error("Completion error: {0}")]
    Completion(String),

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// An error from an outbound HTTP request.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`DaybriefError`].
pub type DaybriefResult<T> = Result<T, DaybriefError>;
