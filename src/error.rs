use std::error::Error as StdError;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Serenity error: {0}")]
    Serenity(Box<poise::serenity_prelude::Error>),

    #[error("{0} not found in environment variables")]
    MissingEnv(&'static str),

    #[error("Failed to send reply to channel {channel_id}: {source}")]
    Send {
        channel_id: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl From<poise::serenity_prelude::Error> for BotError {
    fn from(err: poise::serenity_prelude::Error) -> Self {
        BotError::Serenity(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

/// Failure of a single completion provider call.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("no API key configured")]
    MissingApiKey,

    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("response contained no completion text")]
    EmptyResponse,
}

impl ProviderError {
    /// Short classification used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::MissingApiKey => "auth",
            ProviderError::Api { status, .. } => match *status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => "auth",
                StatusCode::TOO_MANY_REQUESTS => "rate limit",
                status if status.is_server_error() => "server",
                _ => "request",
            },
            ProviderError::Http(e) if e.is_decode() => "malformed response",
            ProviderError::Http(_) => "network",
            ProviderError::EmptyResponse => "malformed response",
        }
    }
}
