//! Platform-neutral view of an inbound message and the reply channel.

use async_trait::async_trait;

use crate::error::Result;

/// The parts of a gateway message the relay cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub author_id: u64,
    pub channel_id: String,
    pub content: String,
    pub mentions: Vec<u64>,
}

impl InboundMessage {
    pub fn mentions_user(&self, user_id: u64) -> bool {
        self.mentions.contains(&user_id)
    }
}

/// Delivers reply text to a channel.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send(&self, channel_id: &str, text: &str) -> Result<()>;
}
