//! Main handler for messages that mention the bot.

use std::sync::Arc;

use log::{debug, error, info};

use crate::completion::{CompletionDispatcher, CompletionResult, PromptRequest};
use crate::error::Result;
use crate::memory::ConversationStore;
use crate::types::Turn;

use super::mention::strip_mentions;
use super::message::{InboundMessage, ReplySink};

/// Sent when the bot is mentioned with no other text.
pub const GREETING: &str = "Hello! How can I help you?";

/// Sent when every completion provider failed.
pub const APOLOGY: &str =
    "Sorry, I'm having trouble processing that right now. Please try again later.";

const PREVIEW_CHARS: usize = 50;

/// What the relay did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Not addressed to the bot, or sent by the bot itself.
    Ignored,
    /// Bare mention answered with the greeting.
    Greeted,
    /// A generated reply was sent and remembered.
    Replied { fallback_used: bool },
    /// Both providers failed and the apology was sent.
    Apologized,
}

pub struct MentionRelay {
    bot_id: u64,
    system_turn: Turn,
    store: Arc<ConversationStore>,
    dispatcher: CompletionDispatcher,
}

impl MentionRelay {
    pub fn new(
        bot_id: u64,
        system_turn: Turn,
        store: Arc<ConversationStore>,
        dispatcher: CompletionDispatcher,
    ) -> Self {
        Self {
            bot_id,
            system_turn,
            store,
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &CompletionDispatcher {
        &self.dispatcher
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub async fn handle(&self, message: &InboundMessage, sink: &dyn ReplySink) -> Result<Outcome> {
        if message.author_id == self.bot_id || !message.mentions_user(self.bot_id) {
            return Ok(Outcome::Ignored);
        }

        info!(
            "Bot mentioned by {} in channel {}",
            message.author_id, message.channel_id
        );

        let content = strip_mentions(&message.content, self.bot_id);
        if content.is_empty() {
            sink.send(&message.channel_id, GREETING).await?;
            return Ok(Outcome::Greeted);
        }

        let channel_id = message.channel_id.as_str();
        self.store.append_turn(channel_id, Turn::user(content)).await;

        let prompt = PromptRequest::new(&self.system_turn, self.store.get_history(channel_id).await);
        debug!("Conversation history for channel {channel_id}:");
        for turn in prompt.turns() {
            let preview: String = turn.content().chars().take(PREVIEW_CHARS).collect();
            debug!("  {:?}: {preview}...", turn.role());
        }

        match self.dispatcher.complete(&prompt).await {
            CompletionResult::Success {
                text,
                provider,
                fallback_used,
            } => {
                self.store
                    .append_turn(channel_id, Turn::assistant(text.clone()))
                    .await;
                sink.send(channel_id, &text).await?;
                info!("Replied in channel {channel_id} using {provider}");
                Ok(Outcome::Replied { fallback_used })
            }
            CompletionResult::Failure(failure) => {
                error!("Completion failed for channel {channel_id}: {failure}");
                sink.send(channel_id, APOLOGY).await?;
                Ok(Outcome::Apologized)
            }
        }
    }
}
