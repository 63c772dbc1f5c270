use crate::Role;
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A single turn in a chat conversation.
///
/// Conversations are passed to drivers as ordered slices of messages, oldest
/// first. The driver converts them to whatever wire shape its backend wants.
///
/// ```
/// use studiolo_core::{ChatMessage, Role};
///
/// let msg = ChatMessage::new(Role::User, "What is a derivative?");
/// assert_eq!(*msg.role(), Role::User);
/// assert_eq!(msg.content(), "What is a derivative?");
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into))]
pub struct ChatMessage {
    /// Who is speaking.
    #[builder(default)]
    role: Role,
    /// The text of the turn.
    content: String,
}

impl ChatMessage {
    /// Creates a message with an explicit role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a builder for constructing a message.
    pub fn builder() -> ChatMessageBuilder {
        ChatMessageBuilder::default()
    }

    /// Shorthand for a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Shorthand for a system framing turn.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Shorthand for a model turn, used when replaying history.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}
