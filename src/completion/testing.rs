//! Scripted providers for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::error::ProviderError;
use crate::types::Turn;

use super::provider::{CompletionParams, CompletionProvider};

/// Returns a fixed reply or a fixed API error and records each call.
pub struct ScriptedProvider {
    name: String,
    reply: Result<String, String>,
    calls: AtomicUsize,
    last_call: Mutex<Option<(Vec<Turn>, CompletionParams)>>,
}

impl ScriptedProvider {
    pub fn ok(name: &str, reply: &str) -> Self {
        Self::with_reply(name, Ok(reply.to_string()))
    }

    pub fn failing(name: &str, message: &str) -> Self {
        Self::with_reply(name, Err(message.to_string()))
    }

    fn with_reply(name: &str, reply: Result<String, String>) -> Self {
        Self {
            name: name.to_string(),
            reply,
            calls: AtomicUsize::new(0),
            last_call: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_call(&self) -> Option<(Vec<Turn>, CompletionParams)> {
        self.last_call.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        "scripted"
    }

    async fn create_completion(
        &self,
        turns: &[Turn],
        params: CompletionParams,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_call.lock().unwrap() = Some((turns.to_vec(), params));
        self.reply.clone().map_err(|message| ProviderError::Api {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message,
        })
    }
}
