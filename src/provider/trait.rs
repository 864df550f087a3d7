//! The `Provider` trait, the seam between the simulation and the LLM backend.

use super::error::Result;
use super::types::{ChatRequest, ChatResponse};
use async_trait::async_trait;

/// A chat-completion backend.
///
/// Implementations must be cheap to clone behind an `Arc` and safe to call
/// from the single-threaded turn loop; each call is independent.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Run one completion request to the backend.
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Provider name, for logging.
    fn name(&self) -> &str;

    /// Model used when a request carries no explicit model.
    fn default_model(&self) -> &str;
}
