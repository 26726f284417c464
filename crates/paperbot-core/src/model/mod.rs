//! Completion-model abstractions (OpenAI today).

pub mod client;
pub mod types;
