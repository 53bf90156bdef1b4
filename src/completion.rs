//! Chat completion providers and the primary/secondary dispatcher.

mod dispatcher;
mod openai_compat;
mod prompt;
mod provider;

pub use dispatcher::{
    CompletionDispatcher, CompletionResult, DispatchFailure, ProviderFailure, ProviderOrder,
};
pub use openai_compat::{MaxTokensField, OpenAiCompatibleProvider, ProviderKind};
pub use prompt::PromptRequest;
pub use provider::{CompletionParams, CompletionProvider};

#[cfg(test)]
pub(crate) mod testing;
