//! Client for services speaking the OpenAI chat completions protocol.

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::ProviderError;
use crate::types::Turn;

use super::provider::{CompletionParams, CompletionProvider};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// The two supported completion backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ProviderKind {
    #[strum(serialize = "OpenAI")]
    OpenAi,
    #[strum(serialize = "Groq")]
    Groq,
}

/// Name of the request field that caps output length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxTokensField {
    /// `max_tokens`
    MaxTokens,
    /// `max_completion_tokens`
    MaxCompletionTokens,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Turn],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

pub struct OpenAiCompatibleProvider {
    name: String,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    max_tokens_field: MaxTokensField,
    client: reqwest::Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(
        kind: ProviderKind,
        endpoint: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        max_tokens_field: MaxTokensField,
    ) -> Self {
        Self {
            name: kind.to_string(),
            endpoint: endpoint.into(),
            api_key,
            model: model.into(),
            max_tokens_field,
            client: reqwest::Client::new(),
        }
    }

    pub fn openai(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self::new(
            ProviderKind::OpenAi,
            OPENAI_API_URL,
            api_key,
            model,
            MaxTokensField::MaxTokens,
        )
    }

    pub fn groq(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self::new(
            ProviderKind::Groq,
            GROQ_API_URL,
            api_key,
            model,
            MaxTokensField::MaxCompletionTokens,
        )
    }

    /// Point the client at a different endpoint, e.g. a proxy.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn build_request<'a>(&'a self, turns: &'a [Turn], params: CompletionParams) -> ChatRequest<'a> {
        let (max_tokens, max_completion_tokens) = match self.max_tokens_field {
            MaxTokensField::MaxTokens => (Some(params.max_output_tokens), None),
            MaxTokensField::MaxCompletionTokens => (None, Some(params.max_output_tokens)),
        };
        ChatRequest {
            model: &self.model,
            messages: turns,
            max_tokens,
            max_completion_tokens,
            temperature: params.temperature,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn create_completion(
        &self,
        turns: &[Turn],
        params: CompletionParams,
    ) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey)?;

        debug!(
            "Sending request to {} ({}) with {} messages",
            self.name,
            self.model,
            turns.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&self.build_request(turns, params))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {e}"));
            return Err(ProviderError::Api { status, message });
        }

        let api_response: ChatResponse = response.json().await?;

        let reply = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ProviderError::EmptyResponse)?;

        debug!("Received response from {}", self.name);
        Ok(reply)
    }
}
