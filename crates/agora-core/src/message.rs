//! Conversation message types.
//!
//! A conversation history is the prompt context for one chat session:
//! an ordered sequence of messages owned by that session alone.

use serde::{Deserialize, Serialize};

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the AI assistant.
    Assistant,
    /// System-generated message.
    System,
}

/// A single message in a conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message.
    pub content: String,
}

impl ConversationMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }
}

/// An ordered conversation history.
///
/// Insertion order is significant: it is the order the messages are sent
/// to the model. The history is owned by a single session and is cleared
/// or replaced, never shared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationHistory {
    messages: Vec<ConversationMessage>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ConversationMessage) {
        self.messages.push(message);
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(ConversationMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(ConversationMessage::assistant(content));
    }

    pub fn push_system(&mut self, content: impl Into<String>) {
        self.push(ConversationMessage::system(content));
    }

    /// Content of the most recent user-authored message, if any.
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_preserves_insertion_order() {
        let mut history = ConversationHistory::new();
        history.push_user("hello");
        history.push_assistant("hi there");
        history.push_user("how are you?");

        let roles: Vec<MessageRole> = history.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![MessageRole::User, MessageRole::Assistant, MessageRole::User]
        );
    }

    #[test]
    fn last_user_message_skips_assistant_turns() {
        let mut history = ConversationHistory::new();
        history.push_system("be helpful");
        history.push_user("first");
        history.push_assistant("reply");

        assert_eq!(history.last_user_message(), Some("first"));

        history.push_user("second");
        assert_eq!(history.last_user_message(), Some("second"));
    }

    #[test]
    fn clear_empties_the_history() {
        let mut history = ConversationHistory::new();
        history.push_user("hello");
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.last_user_message(), None);
    }
}
