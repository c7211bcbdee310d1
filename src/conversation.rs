use chrono::{DateTime, Utc};

use crate::agent;

/// One turn in the transcript.
#[derive(Debug, Clone)]
pub struct Message {
    /// Unique id, monotonically increasing in creation order.
    pub id: String,
    pub content: String,
    pub is_agent: bool,
    pub timestamp: DateTime<Utc>,
}

/// Session-local conversation state.
///
/// The transcript is append-only: messages are never reordered, edited,
/// or removed once pushed. `is_composing` is true exactly while an agent
/// reply is pending, and the submit guard uses it to reject overlapping
/// turns — at most one outstanding agent reply at a time.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    is_composing: bool,
    next_id: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_composing(&self) -> bool {
        self.is_composing
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn push(&mut self, content: String, is_agent: bool) {
        self.next_id += 1;
        self.messages.push(Message {
            id: self.next_id.to_string(),
            content,
            is_agent,
            timestamp: Utc::now(),
        });
    }

    /// Start a user turn.
    ///
    /// Appends the user message (trimmed) and raises the composing flag,
    /// returning the submitted text so the caller can dispatch it after
    /// the thinking pause. Returns `None` without touching any state when
    /// the text is blank or a reply is already pending — both are silent
    /// no-ops by contract, not errors.
    pub fn begin_turn(&mut self, text: &str) -> Option<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            tracing::debug!("ignoring blank submission");
            return None;
        }
        if self.is_composing {
            tracing::debug!("ignoring submission while composing");
            return None;
        }

        let content = trimmed.to_string();
        self.push(content.clone(), false);
        self.is_composing = true;
        Some(content)
    }

    /// Finish the pending turn: append the agent reply and clear the
    /// composing flag.
    pub fn complete_turn(&mut self, reply: String) {
        self.push(reply, true);
        self.is_composing = false;
    }

    /// The full submit operation in its linear form: guard, append user
    /// message, sleep through the thinking pause, dispatch, append agent
    /// message. The TUI splits this across `begin_turn`/`complete_turn`
    /// because it cannot block the event loop; this method is the same
    /// sequence for callers that can await it directly.
    pub async fn run_turn(&mut self, text: &str, delay_min_ms: u64, delay_max_ms: u64) {
        let Some(submitted) = self.begin_turn(text) else {
            return;
        };
        tokio::time::sleep(agent::thinking_delay(delay_min_ms, delay_max_ms)).await;
        let reply = agent::respond(&submitted);
        self.complete_turn(reply.to_string());
    }
}
