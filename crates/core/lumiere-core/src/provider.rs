//! Chat provider seam
//!
//! The advisor talks to the relay through this trait; the HTTP
//! implementation lives in `lumiere-provider-relay` and tests use the
//! scripted double in [`crate::testing`].

use async_trait::async_trait;

use crate::types::ChatRequest;
use crate::Result;

/// A backend able to turn a chat request into a text completion
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send the request and return the completion text
    /// (`choices[0].message.content` on the relay wire)
    async fn complete(&self, request: ChatRequest) -> Result<String>;
}
