use crate::types::Turn;

/// The system turn followed by a channel's history, in send order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    turns: Vec<Turn>,
}

impl PromptRequest {
    pub fn new(system: &Turn, history: Vec<Turn>) -> Self {
        let mut turns = Vec::with_capacity(history.len() + 1);
        turns.push(system.clone());
        turns.extend(history);
        Self { turns }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }
}
