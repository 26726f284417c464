use async_trait::async_trait;

use crate::Result;

use super::types::{Completion, CompletionRequest};

/// Hexagonal port for a chat-completion backend.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Run one completion. Transport and HTTP failures map to `Error::Summarization`.
    async fn complete(&self, req: &CompletionRequest) -> Result<Completion>;
}
