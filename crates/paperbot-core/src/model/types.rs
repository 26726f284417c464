use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Normalized chat-completion request.
///
/// Serializes to the OpenAI `chat/completions` body shape.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

/// Provider-agnostic completion output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Completion {
    /// Message text of each returned choice, in order.
    pub choices: Vec<String>,
}

impl Completion {
    pub fn first(&self) -> Option<&str> {
        self.choices.first().map(String::as_str)
    }
}
