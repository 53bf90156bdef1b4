//! Completion provider capability shared by every backend.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::Turn;

// Discord caps messages at 2000 characters; 300 tokens stays well under it.
const MAX_OUTPUT_TOKENS: u32 = 300;
const TEMPERATURE: f32 = 0.8;

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            max_output_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

/// An external service that turns an ordered list of turns into generated text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Human-readable provider name, used in logs and failure reports.
    fn name(&self) -> &str;

    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    async fn create_completion(
        &self,
        turns: &[Turn],
        params: CompletionParams,
    ) -> Result<String, ProviderError>;
}
