//! Cross-destination abstractions (Discord webhook, Slack channel API).

pub mod port;
pub mod types;
