//! Per-session conversation state.

use std::collections::VecDeque;
use std::time::Instant;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// History, topic memory and rate-limit log of one session.
#[derive(Debug, Default)]
pub struct ConversationState {
    turns: Vec<ChatTurn>,
    last_topic: Option<String>,
    pub(crate) request_timestamps: VecDeque<Instant>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed exchange. History is append-only.
    pub fn record_turn(&mut self, user_text: impl Into<String>, answer: impl Into<String>) {
        self.turns.push(ChatTurn {
            role: Role::User,
            content: user_text.into(),
        });
        self.turns.push(ChatTurn {
            role: Role::Assistant,
            content: answer.into(),
        });
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn last_topic(&self) -> Option<&str> {
        self.last_topic.as_deref()
    }

    pub fn set_last_topic(&mut self, topic: impl Into<String>) {
        self.last_topic = Some(topic.into());
    }

    /// Admitted dispatch attempts currently remembered by the limiter.
    pub fn recorded_requests(&self) -> usize {
        self.request_timestamps.len()
    }

    /// Clear every field: history, topic and rate-limit log.
    pub fn reset(&mut self) {
        self.turns.clear();
        self.last_topic = None;
        self.request_timestamps.clear();
    }
}
