//! LLM Provider Abstraction Layer
//!
//! Unified interface to the chat-completion backend that drives the
//! automated crew and the instructor side-channel.

pub mod error;
pub mod openai;
pub mod retry;
mod r#trait;
pub mod types;

// Re-exports
pub use error::{ProviderError, Result};
pub use openai::OpenAIProvider;
pub use r#trait::Provider;
pub use types::*;
