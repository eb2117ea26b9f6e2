//! Conversation memory: the ordered turns of the current session.

use serde::{Deserialize, Serialize};

use crate::core::config::MemoryConfig;
use crate::core::errors::AssistantError;

/// One exchange. `bot` is `None` while the reply is still being generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub user: String,
    pub bot: Option<String>,
}

/// Append-only turn list for a single conversation.
#[derive(Debug, Default)]
pub struct ConversationMemory {
    turns: Vec<Turn>,
    max_history_turns: Option<usize>,
}

impl ConversationMemory {
    pub fn new(config: &MemoryConfig) -> Self {
        Self {
            turns: Vec::new(),
            max_history_turns: config.max_history_turns,
        }
    }

    /// Record a new turn. Pass `None` for `bot` when the reply will be
    /// filled in by `update_last` once generation finishes.
    pub fn add_message(&mut self, user: impl Into<String>, bot: Option<String>) {
        self.turns.push(Turn {
            user: user.into(),
            bot,
        });
    }

    /// Set the bot reply on the most recent turn.
    pub fn update_last(&mut self, bot: impl Into<String>) -> Result<(), AssistantError> {
        match self.turns.last_mut() {
            Some(turn) => {
                turn.bot = Some(bot.into());
                Ok(())
            }
            None => Err(AssistantError::EmptyHistory),
        }
    }

    pub fn get_history(&self) -> &[Turn] {
        &self.turns
    }

    /// The turns to render into prompts: the whole history, or the most
    /// recent `max_history_turns` when a cap is configured.
    pub fn prompt_window(&self) -> &[Turn] {
        match self.max_history_turns {
            Some(cap) if self.turns.len() > cap => &self.turns[self.turns.len() - cap..],
            _ => &self.turns,
        }
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_update_fills_the_latest_turn_only() {
        let mut memory = ConversationMemory::default();
        memory.add_message("first question", Some("first answer".to_string()));
        memory.add_message("second question", None);

        memory.update_last("second answer").unwrap();

        let history = memory.get_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].bot.as_deref(), Some("first answer"));
        assert_eq!(history[1].user, "second question");
        assert_eq!(history[1].bot.as_deref(), Some("second answer"));
    }

    #[test]
    fn update_on_empty_history_is_an_error() {
        let mut memory = ConversationMemory::default();
        let err = memory.update_last("orphan reply").unwrap_err();
        assert!(matches!(err, AssistantError::EmptyHistory));
    }

    #[test]
    fn prompt_window_is_uncapped_by_default() {
        let mut memory = ConversationMemory::default();
        for i in 0..5 {
            memory.add_message(format!("question {i}"), Some(format!("answer {i}")));
        }
        assert_eq!(memory.prompt_window().len(), 5);
    }

    #[test]
    fn prompt_window_keeps_the_most_recent_turns_when_capped() {
        let config = MemoryConfig {
            max_history_turns: Some(2),
        };
        let mut memory = ConversationMemory::new(&config);
        for i in 0..4 {
            memory.add_message(format!("question {i}"), Some(format!("answer {i}")));
        }

        let window = memory.prompt_window();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].user, "question 2");
        assert_eq!(window[1].user, "question 3");
        // The full history is untouched.
        assert_eq!(memory.get_history().len(), 4);
    }
}
