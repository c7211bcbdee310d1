use ratatui::widgets::ListState;
use tokio::task::JoinHandle;

use crate::agent::{self, ResponseCategory, QUICK_ACTIONS};
use crate::config::Config;
use crate::conversation::Conversation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Role labels shown in the transcript.
pub const USER_LABEL: &str = "Вы:";
pub const AGENT_LABEL: &str = "Коуч:";

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub config: Config,

    pub conversation: Conversation,
    /// In-flight reply: thinking pause + dispatch, run off the event loop.
    /// Present exactly while the conversation is composing.
    reply_task: Option<JoinHandle<String>>,

    // Input state
    pub input: String,
    pub input_cursor: usize, // char index, not byte index

    // Welcome screen quick-action selection
    pub action_state: ListState,

    // Chat scroll state (dimensions recorded during render)
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,

    // Composing indicator animation (0-2 for the ellipsis)
    pub animation_frame: u8,
}

impl App {
    pub fn new(config: Config) -> Self {
        let mut action_state = ListState::default();
        action_state.select(Some(0));

        Self {
            should_quit: false,
            input_mode: InputMode::Editing,
            config,
            conversation: Conversation::new(),
            reply_task: None,
            input: String::new(),
            input_cursor: 0,
            action_state,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
        }
    }

    /// Whether the welcome screen (with the quick actions) is showing.
    pub fn welcome_active(&self) -> bool {
        self.conversation.is_empty()
    }

    /// Submit the text in the input box. Clears the box only when the
    /// conversation accepted the turn; a rejected submission (blank text,
    /// reply pending) leaves the draft in place.
    pub fn submit_input(&mut self) {
        if self.submit_text(self.input.clone()) {
            self.input.clear();
            self.input_cursor = 0;
        }
    }

    /// Submit the currently selected quick-action prompt through the same
    /// pipeline as typed text.
    pub fn submit_selected_action(&mut self) {
        if let Some(i) = self.action_state.selected() {
            if let Some(action) = QUICK_ACTIONS.get(i) {
                self.submit_text(action.prompt.to_string());
            }
        }
    }

    fn submit_text(&mut self, text: String) -> bool {
        let Some(submitted) = self.conversation.begin_turn(&text) else {
            return false;
        };

        let min_ms = self.config.thinking_delay_min_ms;
        let max_ms = self.config.thinking_delay_max_ms;
        self.reply_task = Some(tokio::spawn(async move {
            tokio::time::sleep(agent::thinking_delay(min_ms, max_ms)).await;
            agent::respond(&submitted).to_string()
        }));

        self.scroll_chat_to_bottom();
        true
    }

    /// Collect the agent reply once the thinking pause has elapsed.
    /// Called on every tick; returns true when a reply landed.
    pub async fn poll_reply(&mut self) -> bool {
        let Some(task) = self.reply_task.take_if(|task| task.is_finished()) else {
            return false;
        };

        // is_finished was true, so this await returns immediately.
        let reply = match task.await {
            Ok(reply) => reply,
            Err(e) => {
                // A turn always produces its agent message, even if the
                // dispatch task died.
                tracing::error!(error = %e, "reply task failed");
                ResponseCategory::Fallback.body().to_string()
            }
        };

        self.conversation.complete_turn(reply);
        self.scroll_chat_to_bottom();
        true
    }

    /// Advance the "Думаю..." ellipsis while a reply is pending.
    pub fn tick_animation(&mut self) {
        if self.conversation.is_composing() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Welcome screen navigation
    pub fn action_nav_down(&mut self) {
        let len = QUICK_ACTIONS.len();
        let i = self.action_state.selected().unwrap_or(0);
        self.action_state.select(Some((i + 1).min(len - 1)));
    }

    pub fn action_nav_up(&mut self) {
        let i = self.action_state.selected().unwrap_or(0);
        self.action_state.select(Some(i.saturating_sub(1)));
    }

    // Chat scrolling
    pub fn scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.chat_scroll = (self.chat_scroll + 1).min(self.max_chat_scroll());
    }

    pub fn scroll_half_page_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(self.chat_height / 2);
    }

    pub fn scroll_half_page_down(&mut self) {
        self.chat_scroll = (self.chat_scroll + self.chat_height / 2).min(self.max_chat_scroll());
    }

    pub fn scroll_to_top(&mut self) {
        self.chat_scroll = 0;
    }

    /// Pin the transcript to its end so the newest message (or the
    /// composing indicator) is visible.
    pub fn scroll_chat_to_bottom(&mut self) {
        self.chat_scroll = self.max_chat_scroll();
    }

    fn max_chat_scroll(&self) -> u16 {
        let visible = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };
        self.total_chat_lines().saturating_sub(visible)
    }

    /// Wrap-aware line count of the rendered transcript. Counts chars,
    /// not bytes — the content is Cyrillic.
    fn total_chat_lines(&self) -> u16 {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total: u16 = 0;
        for msg in self.conversation.messages() {
            total += 1; // role label line
            for line in msg.content.lines() {
                let chars = line.chars().count();
                if chars == 0 {
                    total += 1;
                } else {
                    total += ((chars - 1) / wrap_width + 1) as u16;
                }
            }
            total += 1; // blank line between messages
        }

        if self.conversation.is_composing() {
            total += 2; // label + "Думаю..."
        }

        total
    }
}
