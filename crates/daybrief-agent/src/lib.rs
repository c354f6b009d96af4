//! Language-model completion for Daybrief.
//!
//! Two interchangeable backends speak the OpenAI chat-completions wire format:
//! an Azure OpenAI deployment and a local OpenAI-compatible server such as
//! LM Studio. [`ProviderSelector`] picks one at startup from [`AiConfig`].

pub mod backends;
pub mod config;
pub mod selector;

pub use backends::azure::AzureOpenAiProvider;
pub use backends::local::LocalModelProvider;
pub use backends::CompletionProvider;
pub use config::{AiConfig, AzureConfig, LocalConfig, ProviderKind};
pub use selector::ProviderSelector;
