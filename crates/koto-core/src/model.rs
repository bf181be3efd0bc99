//! Language-model seam.
//!
//! The core never talks HTTP itself; a driver crate (or a test mock)
//! implements [`LanguageModel`] and is injected at construction time.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("model transport error: {0}")]
    Transport(String),

    #[error("model returned an empty reply")]
    Empty,
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// One prompt in, raw text out. No streaming, no tool calls.
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}
