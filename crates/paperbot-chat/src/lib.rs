//! Chat destination adapters.
//!
//! This crate implements the `paperbot-core` Notifier port over a Discord
//! webhook and over the Slack Web API.

use std::{sync::Arc, time::Duration};

use paperbot_core::{config::Destination, messaging::port::Notifier, Result};

pub mod discord;
pub mod slack;

pub use discord::DiscordWebhook;
pub use slack::SlackNotifier;

/// Build the notifier selected by configuration.
pub fn notifier_for(destination: &Destination, timeout: Duration) -> Result<Arc<dyn Notifier>> {
    let notifier: Arc<dyn Notifier> = match destination {
        Destination::DiscordWebhook { url } => Arc::new(DiscordWebhook::new(url.clone(), timeout)?),
        Destination::Slack {
            token,
            channel,
            api_base_url,
        } => Arc::new(
            SlackNotifier::new(token.clone(), channel.clone(), timeout)?
                .with_base_url(api_base_url.clone()),
        ),
    };
    Ok(notifier)
}
