//! Per-channel bounded conversation memory.

use std::collections::{HashMap, VecDeque};

use log::debug;
use tokio::sync::Mutex;

use crate::types::Turn;

/// Maximum number of turns remembered per channel.
pub const MAX_HISTORY_TURNS: usize = 10;

/// Process-wide mapping from channel id to its most recent turns.
///
/// Histories are created on first append and live for the lifetime of the
/// store. The mutex makes each append-and-trim atomic, so concurrent event
/// handlers cannot break ordering or exceed the cap.
#[derive(Debug)]
pub struct ConversationStore {
    histories: Mutex<HashMap<String, VecDeque<Turn>>>,
    capacity: usize,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY_TURNS)
    }

    /// Create a store keeping at most `capacity` turns per channel (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            histories: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a turn to the channel's history, dropping the oldest turns
    /// beyond the cap.
    pub async fn append_turn(&self, channel_id: &str, turn: Turn) {
        let mut histories = self.histories.lock().await;
        let history = histories.entry(channel_id.to_string()).or_default();
        history.push_back(turn);
        while history.len() > self.capacity {
            history.pop_front();
        }
        debug!(
            "Channel {channel_id} history now holds {} turns",
            history.len()
        );
    }

    /// Current history for the channel, oldest first. Empty if unseen.
    pub async fn get_history(&self, channel_id: &str) -> Vec<Turn> {
        self.histories
            .lock()
            .await
            .get(channel_id)
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of channels with a history.
    pub async fn channel_count(&self) -> usize {
        self.histories.lock().await.len()
    }
}
