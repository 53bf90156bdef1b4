//! Primary/secondary completion dispatch.

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use thiserror::Error;

use crate::error::ProviderError;

use super::prompt::PromptRequest;
use super::provider::{CompletionParams, CompletionProvider};

/// Which backend is tried first. Fixed for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderOrder {
    OpenAiFirst,
    GroqFirst,
}

impl ProviderOrder {
    pub fn from_flag(use_groq: bool) -> Self {
        if use_groq {
            ProviderOrder::GroqFirst
        } else {
            ProviderOrder::OpenAiFirst
        }
    }
}

/// A provider that was tried and the error it returned.
#[derive(Debug)]
pub struct ProviderFailure {
    pub provider: String,
    pub error: ProviderError,
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.provider, self.error)
    }
}

/// Every provider attempted during one dispatch failed.
#[derive(Debug, Error)]
#[error("All providers failed. {}", join_attempts(.attempts))]
pub struct DispatchFailure {
    pub attempts: Vec<ProviderFailure>,
}

fn join_attempts(attempts: &[ProviderFailure]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Outcome of a dispatch.
#[derive(Debug)]
pub enum CompletionResult {
    Success {
        text: String,
        provider: String,
        fallback_used: bool,
    },
    Failure(DispatchFailure),
}

/// Calls the primary provider, then the secondary once if the primary fails.
///
/// Holds no per-call state; the same dispatcher serves every channel.
pub struct CompletionDispatcher {
    primary: Arc<dyn CompletionProvider>,
    secondary: Arc<dyn CompletionProvider>,
    params: CompletionParams,
}

impl CompletionDispatcher {
    pub fn new(
        primary: Arc<dyn CompletionProvider>,
        secondary: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            primary,
            secondary,
            params: CompletionParams::default(),
        }
    }

    /// Slot the two backends according to the configured order.
    pub fn from_order(
        order: ProviderOrder,
        openai: Arc<dyn CompletionProvider>,
        groq: Arc<dyn CompletionProvider>,
    ) -> Self {
        let dispatcher = match order {
            ProviderOrder::OpenAiFirst => Self::new(openai, groq),
            ProviderOrder::GroqFirst => Self::new(groq, openai),
        };
        info!(
            "Using {} API ({}) with {} fallback ({})",
            dispatcher.primary.name(),
            dispatcher.primary.model(),
            dispatcher.secondary.name(),
            dispatcher.secondary.model()
        );
        dispatcher
    }

    pub fn primary_name(&self) -> &str {
        self.primary.name()
    }

    pub fn secondary_name(&self) -> &str {
        self.secondary.name()
    }

    pub async fn complete(&self, prompt: &PromptRequest) -> CompletionResult {
        let turns = prompt.turns();

        let primary_error = match self.primary.create_completion(turns, self.params).await {
            Ok(text) => {
                debug!("Primary provider {} answered", self.primary.name());
                return CompletionResult::Success {
                    text,
                    provider: self.primary.name().to_string(),
                    fallback_used: false,
                };
            }
            Err(e) => e,
        };

        warn!(
            "Primary API ({}) failed with {} error: {primary_error}; trying {}",
            self.primary.name(),
            primary_error.kind(),
            self.secondary.name()
        );
        let mut attempts = vec![ProviderFailure {
            provider: self.primary.name().to_string(),
            error: primary_error,
        }];

        match self.secondary.create_completion(turns, self.params).await {
            Ok(text) => {
                info!("Fallback API ({}) succeeded", self.secondary.name());
                CompletionResult::Success {
                    text,
                    provider: self.secondary.name().to_string(),
                    fallback_used: true,
                }
            }
            Err(e) => {
                warn!(
                    "Fallback API ({}) also failed with {} error: {e}",
                    self.secondary.name(),
                    e.kind()
                );
                attempts.push(ProviderFailure {
                    provider: self.secondary.name().to_string(),
                    error: e,
                });
                CompletionResult::Failure(DispatchFailure { attempts })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::testing::ScriptedProvider;
    use crate::types::Turn;

    fn prompt() -> PromptRequest {
        PromptRequest::new(&Turn::system("rules"), vec![Turn::user("hello")])
    }

    #[tokio::test]
    async fn primary_success_skips_secondary() {
        let primary = Arc::new(ScriptedProvider::ok("OpenAI", "from primary"));
        let secondary = Arc::new(ScriptedProvider::ok("Groq", "from secondary"));
        let dispatcher = CompletionDispatcher::new(primary.clone(), secondary.clone());

        let result = dispatcher.complete(&prompt()).await;
        match result {
            CompletionResult::Success {
                text,
                provider,
                fallback_used,
            } => {
                assert_eq!(text, "from primary");
                assert_eq!(provider, "OpenAI");
                assert!(!fallback_used);
            }
            CompletionResult::Failure(f) => panic!("unexpected failure: {f}"),
        }
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn falls_back_once_on_primary_failure() {
        let primary = Arc::new(ScriptedProvider::failing("Groq", "invalid api key"));
        let secondary = Arc::new(ScriptedProvider::ok("OpenAI", "from secondary"));
        let dispatcher = CompletionDispatcher::new(primary.clone(), secondary.clone());

        match dispatcher.complete(&prompt()).await {
            CompletionResult::Success {
                text,
                provider,
                fallback_used,
            } => {
                assert_eq!(text, "from secondary");
                assert_eq!(provider, "OpenAI");
                assert!(fallback_used);
            }
            CompletionResult::Failure(f) => panic!("unexpected failure: {f}"),
        }
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);
    }

    #[tokio::test]
    async fn both_failures_are_reported_in_order() {
        let primary = Arc::new(ScriptedProvider::failing("OpenAI", "quota exceeded"));
        let secondary = Arc::new(ScriptedProvider::failing("Groq", "service unavailable"));
        let dispatcher = CompletionDispatcher::new(primary.clone(), secondary.clone());

        let CompletionResult::Failure(failure) = dispatcher.complete(&prompt()).await else {
            panic!("expected failure");
        };
        assert_eq!(failure.attempts.len(), 2);
        assert_eq!(failure.attempts[0].provider, "OpenAI");
        assert_eq!(failure.attempts[1].provider, "Groq");
        assert!(failure.attempts[0].error.to_string().contains("quota exceeded"));
        assert!(failure.attempts[1].error.to_string().contains("service unavailable"));

        let rendered = failure.to_string();
        assert!(rendered.contains("OpenAI"));
        assert!(rendered.contains("Groq"));
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);
    }

    #[tokio::test]
    async fn providers_receive_full_prompt_and_fixed_params() {
        let primary = Arc::new(ScriptedProvider::failing("OpenAI", "down"));
        let secondary = Arc::new(ScriptedProvider::ok("Groq", "ok"));
        let dispatcher = CompletionDispatcher::new(primary.clone(), secondary.clone());

        dispatcher.complete(&prompt()).await;

        let expected = prompt().turns().to_vec();
        for provider in [&primary, &secondary] {
            let (turns, params) = provider.last_call().expect("provider was called");
            assert_eq!(turns, expected);
            assert_eq!(params.max_output_tokens, 300);
            assert!((params.temperature - 0.8).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn flag_selects_order() {
        let openai: Arc<dyn CompletionProvider> = Arc::new(ScriptedProvider::ok("OpenAI", ""));
        let groq: Arc<dyn CompletionProvider> = Arc::new(ScriptedProvider::ok("Groq", ""));

        let dispatcher = CompletionDispatcher::from_order(
            ProviderOrder::from_flag(true),
            openai.clone(),
            groq.clone(),
        );
        assert_eq!(dispatcher.primary_name(), "Groq");
        assert_eq!(dispatcher.secondary_name(), "OpenAI");

        let dispatcher =
            CompletionDispatcher::from_order(ProviderOrder::from_flag(false), openai, groq);
        assert_eq!(dispatcher.primary_name(), "OpenAI");
        assert_eq!(dispatcher.secondary_name(), "Groq");
    }
}
