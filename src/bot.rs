//! Discord gateway wiring and event handling.

use std::num::NonZeroU64;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, info};
use poise::{
    Framework, FrameworkOptions, PrefixFrameworkOptions, builtins,
    serenity_prelude::{
        ChannelId, ClientBuilder, Context, FullEvent, GatewayIntents, Http,
        Message as SerenityMessage, UserId,
    },
};

use crate::commands;
use crate::completion::{
    CompletionDispatcher, CompletionProvider, OpenAiCompatibleProvider, ProviderOrder,
};
use crate::config::Config;
use crate::error::{BotError, Result};
use crate::memory::ConversationStore;
use crate::relay::{InboundMessage, MentionRelay, Outcome, ReplySink};
use crate::types::Turn;

pub struct Data {
    pub relay: MentionRelay,
}

/// Sends replies through the Discord HTTP API.
struct ChannelSink<'a> {
    http: &'a Http,
}

#[async_trait]
impl ReplySink for ChannelSink<'_> {
    async fn send(&self, channel_id: &str, text: &str) -> Result<()> {
        let id = channel_id
            .parse::<NonZeroU64>()
            .map_err(|e| BotError::Send {
                channel_id: channel_id.to_string(),
                source: Box::new(e),
            })?;
        ChannelId::new(id.get())
            .say(self.http, text)
            .await
            .map_err(|e| BotError::Send {
                channel_id: channel_id.to_string(),
                source: Box::new(e),
            })?;
        Ok(())
    }
}

/// Run the Discord bot.
pub async fn run() -> Result<()> {
    info!("Initializing bot");
    let config = Config::from_env()?;

    debug!("Initializing completion providers");
    let openai: Arc<dyn CompletionProvider> = Arc::new(OpenAiCompatibleProvider::openai(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
    ));
    let groq: Arc<dyn CompletionProvider> = Arc::new(OpenAiCompatibleProvider::groq(
        config.groq_api_key.clone(),
        config.groq_model.clone(),
    ));
    let dispatcher =
        CompletionDispatcher::from_order(ProviderOrder::from_flag(config.use_groq), openai, groq);

    let store = Arc::new(ConversationStore::new());
    let system_turn = Turn::system(config.system_prompt.clone());

    debug!("Setting up gateway intents");
    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;

    debug!("Building framework");
    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: vec![commands::status()],
            prefix_options: PrefixFrameworkOptions {
                prefix: Some("!".to_string()),
                mention_as_prefix: false,
                ..Default::default()
            },
            event_handler: |ctx, event, _framework, data| Box::pin(event_handler(ctx, event, data)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("{} has connected to Discord!", ready.user.name);
                debug!("Registering commands globally");
                builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Commands registered successfully");
                Ok(Data {
                    relay: MentionRelay::new(ready.user.id.get(), system_turn, store, dispatcher),
                })
            })
        })
        .build();

    debug!("Creating Discord client");
    let mut client = ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await?;

    info!("Starting Discord client");

    tokio::select! {
        result = client.start() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, shutting down...");
        }
    }

    Ok(())
}

fn to_inbound(message: &SerenityMessage) -> InboundMessage {
    InboundMessage {
        author_id: message.author.id.get(),
        channel_id: message.channel_id.to_string(),
        content: message.content.clone(),
        mentions: message.mentions.iter().map(|user| user.id.get()).collect(),
    }
}

async fn event_handler(ctx: &Context, event: &FullEvent, data: &Data) -> Result<()> {
    let FullEvent::Message { new_message } = event else {
        return Ok(());
    };

    let bot_user_id: UserId = ctx.cache.current_user().id;
    if new_message.author.id != bot_user_id && new_message.mentions_user_id(bot_user_id) {
        debug!(
            "Message from {} mentions: {:?}",
            new_message.author.tag(),
            new_message
                .mentions
                .iter()
                .map(|user| user.id)
                .collect::<Vec<_>>()
        );
        if let Err(e) = new_message.channel_id.broadcast_typing(&ctx.http).await {
            debug!("Failed to broadcast typing indicator: {e}");
        }
    }

    let sink = ChannelSink { http: &ctx.http };
    match data.relay.handle(&to_inbound(new_message), &sink).await {
        Ok(Outcome::Ignored) => {}
        Ok(outcome) => debug!(
            "Handled message from {} in channel {}: {outcome:?}",
            new_message.author.tag(),
            new_message.channel_id
        ),
        Err(e) => error!(
            "Error processing message from {}: {e}",
            new_message.author.tag()
        ),
    }

    Ok(())
}
