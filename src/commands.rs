//! Prefix and slash commands.

use crate::bot::Data;
use crate::error::{BotError, Result};

type Context<'a> = poise::Context<'a, Data, BotError>;

/// Show the completion providers in use and how much of this channel is remembered.
#[poise::command(slash_command, prefix_command)]
pub async fn status(ctx: Context<'_>) -> Result<()> {
    let relay = &ctx.data().relay;
    let channels = relay.store().channel_count().await;
    let remembered = relay
        .store()
        .get_history(&ctx.channel_id().to_string())
        .await
        .len();

    ctx.say(format_status(
        relay.dispatcher().primary_name(),
        relay.dispatcher().secondary_name(),
        remembered,
        relay.store().capacity(),
        channels,
    ))
    .await?;
    Ok(())
}

fn format_status(
    primary: &str,
    secondary: &str,
    remembered: usize,
    capacity: usize,
    channels: usize,
) -> String {
    format!(
        "Using **{primary}** with **{secondary}** fallback. \
         Remembering {remembered}/{capacity} messages in this channel \
         ({channels} channels in memory)."
    )
}
